use crate::application::ports::schema_migrations::MigrationInfo;
use crate::presentation::middleware::exception::{ErrorKind, UnhandledError};
use crate::presentation::middleware::migrations_endpoint::MIGRATIONS_ENDPOINT_PATH;

use super::text;

pub struct RequestSummary {
    pub method: String,
    pub uri: String,
}

pub enum DatabaseDiagnostics {
    Pending(Vec<MigrationInfo>),
    Unavailable(String),
}

/// Standalone page (no layout) so it renders even when the layout is what failed.
pub fn developer_exception_page(
    request: &RequestSummary,
    err: &UnhandledError,
    database: Option<&DatabaseDiagnostics>,
) -> String {
    let heading = match err.kind {
        ErrorKind::Handler => "An unhandled exception occurred while processing the request.",
        ErrorKind::Database => "A database operation failed while processing the request.",
        ErrorKind::Panic => "A request handler panicked while processing the request.",
    };
    let database_section = database.map(database_section).unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <title>Internal Server Error</title>\n<link rel=\"stylesheet\" href=\"/css/site.css\" />\n</head>\n\
         <body>\n<main class=\"container\">\n<h1>{heading}</h1>\n\
         <p><strong>{method}</strong> <code>{uri}</code></p>\n\
         <h2 class=\"text-danger\">{message}</h2>\n<pre class=\"stack\">{detail}</pre>\n\
         {database_section}\n</main>\n</body>\n</html>\n",
        heading = heading,
        method = text(&request.method),
        uri = text(&request.uri),
        message = text(&err.message),
        detail = text(&err.detail),
        database_section = database_section,
    )
}

fn database_section(database: &DatabaseDiagnostics) -> String {
    match database {
        DatabaseDiagnostics::Unavailable(reason) => format!(
            "<h3>Could not inspect migrations</h3>\n<p>{}</p>",
            text(reason)
        ),
        DatabaseDiagnostics::Pending(pending) if pending.is_empty() => {
            "<h3>Migrations</h3>\n<p>All migrations have been applied.</p>".into()
        }
        DatabaseDiagnostics::Pending(pending) => {
            let items: String = pending
                .iter()
                .map(|m| format!("<li>{} {}</li>", m.version, text(&m.description)))
                .collect();
            format!(
                "<h3>Applying existing migrations may resolve this issue</h3>\n\
                 <p>There are migrations that have not been applied to the database:</p>\n<ul>{items}</ul>\n\
                 <p><button id=\"apply-migrations\" type=\"button\">Apply Migrations</button> \
                 <span id=\"apply-migrations-status\"></span></p>\n\
                 <script>\n\
                 document.getElementById('apply-migrations').addEventListener('click', async () => {{\n\
                   const status = document.getElementById('apply-migrations-status');\n\
                   status.textContent = 'Applying migrations...';\n\
                   const res = await fetch('{endpoint}', {{ method: 'POST', body: new URLSearchParams({{ context: 'default' }}) }});\n\
                   status.textContent = res.ok ? 'Migrations Applied. Try refreshing the page.' : await res.text();\n\
                 }});\n\
                 </script>",
                items = items,
                endpoint = MIGRATIONS_ENDPOINT_PATH,
            )
        }
    }
}
