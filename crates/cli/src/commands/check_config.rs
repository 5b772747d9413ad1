use questline_core::AppConfig;
use url::Url;

fn presence(value: Option<&str>) -> &'static str {
    if value.is_some() { "set" } else { "not set" }
}

/// Mask credentials embedded in a URL's userinfo.
pub(crate) fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "set (unparseable)".to_owned();
    };
    if url.username().is_empty() && url.password().is_none() {
        return url.to_string();
    }
    // Both setters only fail for cannot-be-a-base URLs, which carry no userinfo.
    if url.set_username("***").is_err() || url.set_password(None).is_err() {
        return "set (unparseable)".to_owned();
    }
    url.to_string()
}

pub(crate) fn run(config: &AppConfig) {
    let ai_url = config.ai_server_url.as_deref().map_or_else(|| "not set".to_owned(), redact_url);
    let ai_ws = config.ai_server_ws.as_deref().map_or_else(|| "not set".to_owned(), redact_url);

    println!("listen:        {}:{}", config.host, config.port);
    println!("database_url:  {}", presence(config.database_url.as_deref()));
    println!("ai_server_url: {ai_url}");
    println!("ai_server_ws:  {ai_ws}");
    if config.mail_configured() {
        println!("mail:          smtp {}:{}", config.mail_host, config.mail_port);
    } else {
        println!("mail:          log only");
    }
    println!("upload_dir:    {}", config.upload_dir.display());
    println!("cors_origin:   {}", config.cors_origin.as_deref().unwrap_or("any"));
    if config.jwt_secret == questline_core::DEV_JWT_SECRET {
        println!("jwt_secret:    development default");
    } else {
        println!("jwt_secret:    set");
    }
}
