//! # plantuml-render
//!
//! Render [PlantUML](https://plantuml.com) diagrams to SVG through a
//! PlantUML server.
//!
//! ## Transport
//!
//! - Without an explicit server, the source is compressed, written with the
//!   PlantUML URL alphabet and sent as `GET {default}/svg/{token}` to the
//!   public server, which does not accept POST.
//! - With an explicit server, the raw source is sent as `POST {server}/svg`.
//!
//! A `403 Forbidden` is retried once after two seconds. Any other non-200
//! status is returned as [`RenderError::ServerError`].
//!
//! ## Example
//!
//! ```no_run
//! use plantuml_render::{encoding, PlantUmlClient};
//!
//! # async fn run() -> plantuml_render::Result<()> {
//! let source = "@startuml\nAlice -> Bob: hello\n@enduml";
//!
//! // Render via the public server
//! let svg = PlantUmlClient::new().render_svg(source, None).await?;
//!
//! // Or via a self-hosted server
//! let svg = plantuml_render::render_svg(source, Some("http://localhost:8080")).await?;
//!
//! // Or just get the token for a link
//! let token = encoding::encode(source)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod request;
pub mod retry;

pub use client::{render_svg, PlantUmlClient};
pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use request::{RenderRequest, DEFAULT_SERVER};
pub use retry::RetryPolicy;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
