//! Domain records and request DTOs
//!
//! - `user`: accounts, registration and login forms
//! - `category`: task categories
//! - `location`: the location tree
//! - `task`: tasks, recurrence and listing filters
//! - `rules`: validation rules and lenient deserializers shared by the DTOs

pub mod category;
pub mod location;
pub mod rules;
pub mod task;
pub mod user;

pub use category::{Category, CategoryFields, CategoryRequest};
pub use location::{Location, LocationFields, LocationRequest};
pub use task::{
    AssignRequest, Priority, RecurrenceType, RecurrenceUnit, StatusRequest, Task, TaskFields,
    TaskFilters, TaskRequest, TaskStatus,
};
pub use user::{CreateUser, LoginRequest, Role, User, UserRequest};
