//! Authentication and authorization module
//!
//! - `password`: bcrypt hashing and verification
//! - `token`: signed access/refresh token codec (HS256 JWT)
//! - `directory`: principal lookup across users and technicians
//! - `refresh`: persisted refresh-token store
//! - `gateway`: login / refresh / logout orchestration
//! - `gate`: per-request authorization middleware and route rules

pub mod directory;
pub mod gate;
pub mod gateway;
pub mod password;
pub mod refresh;
pub mod token;

pub use directory::{Principal, PrincipalDirectory};
pub use gate::{authorization_gate, default_route_rules, AuthenticatedPrincipal, GateState, RouteAccess, RouteRule};
pub use gateway::{AuthError, AuthGateway, TokenPair};
pub use password::{hash_password, verify_password};
pub use refresh::RefreshTokenStore;
pub use token::{issue_token, verify_token, Claims, TokenConfig};
