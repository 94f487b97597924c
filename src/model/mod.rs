//! The data model shared by every component: clients, scopes, resource
//! owners, and the token/code entity (§3).

mod client;
mod resource_owner;
mod scope;
mod token;

pub use client::{Client, GrantType};
pub use resource_owner::ResourceOwner;
pub use scope::{join_scope, split_scope, Scope};
pub use token::{CodeChallengeMethod, Token, TokenType};
