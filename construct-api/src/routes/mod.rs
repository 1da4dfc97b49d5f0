/// API route handlers
///
/// Handlers are thin: deserialize, validate, call one service method, map
/// the result. Tenant-scoped handlers take the `TenantScope` extractor;
/// company administration takes `AdminScope`.
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, federated login, token verification
/// - `public`: Anonymous profile, project and click endpoints
/// - `users`: The caller's own account
/// - `company`: Company settings and members (admin)
/// - `clients`: Clients and comments
/// - `projects`: Projects, tasks and subtasks
/// - `links`: Trackable links

pub mod auth;
pub mod clients;
pub mod company;
pub mod health;
pub mod links;
pub mod projects;
pub mod public;
pub mod users;
