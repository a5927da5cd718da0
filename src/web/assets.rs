macro_rules! asset {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/web/assets/", $file))
    };
}

pub const INDEX_HTML: &str = asset!("index.html");

pub struct StaticAsset {
    pub content_type: &'static str,
    pub body: &'static str,
}

pub fn lookup(name: &str) -> Option<StaticAsset> {
    let (content_type, body) = match name {
        "styles.css" => ("text/css; charset=utf-8", asset!("styles.css")),
        "app.js" => ("application/javascript; charset=utf-8", asset!("app.js")),
        _ => return None,
    };
    Some(StaticAsset { content_type, body })
}
