use std::sync::Arc;

use crate::auth::TokenSigner;
use crate::storage::RecordStore;
use crate::tips::TipGenerator;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub tips: Arc<TipGenerator>,
    pub signer: Arc<TokenSigner>,
}
