use super::text;

pub fn index(email: Option<&str>) -> String {
    let greeting = match email {
        Some(e) => format!("<p>Signed in as {}.</p>", text(e)),
        None => String::new(),
    };
    format!(
        "<div class=\"text-center\">\n<h1>Welcome</h1>\n{greeting}\n\
         <p>Learn about building web apps in Rust with axum and sqlx.</p>\n</div>"
    )
}

pub fn privacy() -> String {
    "<h1>Privacy Policy</h1>\n<p>Use this page to detail your site's privacy policy.</p>".into()
}

pub fn error(request_id: Option<&str>) -> String {
    let request = request_id
        .map(|id| {
            format!(
                "<p><strong>Request ID:</strong> <code>{}</code></p>",
                text(id)
            )
        })
        .unwrap_or_default();
    format!(
        "<h1 class=\"text-danger\">Error.</h1>\n\
         <h2 class=\"text-danger\">An error occurred while processing your request.</h2>\n\
         {request}\n<h3>Development Mode</h3>\n\
         <p>Swapping to the <strong>Development</strong> environment displays detailed information \
         about the error that occurred.</p>\n\
         <p><strong>The Development environment shouldn't be enabled for deployed applications.</strong> \
         Set <code>RUST_ENV</code> to <code>Development</code> only for local debugging.</p>"
    )
}
