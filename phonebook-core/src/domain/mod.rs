//! Core domain entities
//!
//! Plain data: what the backend sends and accepts, what the session holds,
//! and what the route table is made of. No I/O here.

mod phone;
pub mod result;
pub mod route;
pub mod session;
mod user;

pub use phone::{NewPhone, Phone, PhoneUpdate};
pub use route::{Access, RouteDescriptor, RouteTarget, View};
pub use session::{AuthState, LoginResponse, Session};
pub use user::{NewUser, PasswordChange, PhotoUpload, User, UserProfile, UserUpdate};
