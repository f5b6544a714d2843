//! Bot registry feature.
//!
//! Owners register bots and look them up again by owner name and number.
//! Duplicate owner pairs are allowed; lookup returns the first match in the
//! storage backend's order.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/register-bot` | Register a bot from a JSON body |
//! | GET | `/api/register-bot` | Describe the endpoint, or register from query params |
//! | GET | `/api/get-bot?name=&number=` | Look up a bot by owner |
//! | GET | `/api/list-bots` | List all bots |
//! | DELETE | `/api/delete-bot/{id}` | Delete a bot |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::BotService;
