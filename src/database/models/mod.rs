pub mod client;
pub mod oauth_state;
pub mod oauth_token;
pub mod trainer;
pub mod training_session;

pub use client::*;
pub use oauth_state::*;
pub use oauth_token::*;
pub use trainer::*;
pub use training_session::*;
