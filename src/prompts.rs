pub const WALLPAPER_GENERATE: &str = include_str!("../data/prompts/wallpaper_generate.txt");
pub const WALLPAPER_REMIX: &str = include_str!("../data/prompts/wallpaper_remix.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.trim_end().to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
