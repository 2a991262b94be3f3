//! Emoji web pages in the markup conventions the scraper understands.

/// Page using the `card-body emoji-pad` container around the emoji image.
pub fn emoji_page(src: &str, alt: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><title>{alt} - Emoji</title></head>
  <body>
    <nav><img src="/assets/logo.png" alt="logo"></nav>
    <div class="card">
      <div class="card-body emoji-pad">
        <img src="{src}" alt="{alt}" class="img-fluid">
      </div>
    </div>
  </body>
</html>"#
    )
}

/// Page tagging the emoji image itself with the `emoji-img` class.
pub fn legacy_emoji_page(src: &str, alt: &str) -> String {
    format!(
        r#"<html><body>
<img src="/static/banner.png" alt="banner">
<img class="emoji-img" src="{src}" alt="{alt}">
</body></html>"#
    )
}

/// Page with images but no emoji marker at all.
pub fn page_without_emoji() -> String {
    r#"<html><body>
<div class="card-body"><img src="/img/avatar.png" alt="avatar"></div>
<p>Nothing to see here</p>
</body></html>"#
        .to_string()
}
