pub mod login;
pub mod token;

pub use login::{decode_claims, login, login_and_store, logout, renew, renew_and_store};
pub use token::{token_check, token_clear, token_condition, token_get, token_set};
