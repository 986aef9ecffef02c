use tera::Tera;

use crate::config::UiConfig;
use crate::error::AppError;

/// Initialize the Tera template engine from the configured templates directory
pub fn init_templates(ui: &UiConfig) -> Result<Tera, AppError> {
    let mut tera = Tera::new(&ui.template_glob())?;
    tera.register_filter("song_label", song_label_filter);
    Ok(tera)
}

/// Render a song object as "Name by Artist"
fn song_label_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| tera::Error::msg("song_label filter expects an object with a name"))?;
    let artist = value
        .get("artist")
        .and_then(|v| v.as_str())
        .ok_or_else(|| tera::Error::msg("song_label filter expects an object with an artist"))?;

    Ok(tera::Value::String(format!("{} by {}", name, artist)))
}
