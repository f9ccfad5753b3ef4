pub mod model;
pub mod resolver;

pub use resolver::{IdentityResolver, SsoIdentityResolver};
