/// Database models
///
/// Each model is a `sqlx::FromRow` struct with its queries in an `impl`
/// block. Tenant-owned models take a [`TenantId`](crate::tenant::TenantId)
/// on every query and filter by it in SQL.
///
/// # Models
///
/// - `Company`: tenant root
/// - `User`: account with optional company membership and role
/// - `Client` / `Comment`: customer records and notes
/// - `Project` / `Task` / `Subtask`: work tracking tree
/// - `Link` / `LinkClick`: trackable links and their click events

pub mod client;
pub mod company;
pub mod link;
pub mod project;
pub mod user;

pub use client::{Client, Comment, CreateClient, UpdateClient};
pub use company::{Company, CreateCompany, UpdateCompany};
pub use link::{CreateLink, Link, LinkClick, UpdateLink};
pub use project::{
    CreateProject, CreateSubtask, CreateTask, Project, Subtask, Task, UpdateProject, WorkStatus,
    DEFAULT_PROJECT_STATUS,
};
pub use user::{CreateUser, UpdateProfile, User, UserRole};
