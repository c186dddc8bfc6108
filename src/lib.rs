// Module layout (Clean Architecture style)
// - bootstrap: configuration, service wiring and the middleware pipeline
// - infrastructure: database adapters
// - presentation: middleware, MVC controllers, identity pages and views
// - application: ports, identity use cases and token services
// - domain: identity model and policies

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;
