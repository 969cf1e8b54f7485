// Formguard - anti-forgery tokens for form submissions
//
// Facade crate re-exporting the token toolkit.

pub use formguard_token::*;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Clock, FormToken, SecretSource, SystemClock, Token, TokenConfig, TokenError, TokenGuard,
        TokenIssuer,
    };
}
