pub mod controllers;
pub mod route;

pub const DEFAULT_ROUTE: &str = "{controller=Home}/{action=Index}/{id?}";
