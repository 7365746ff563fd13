//! Server-rendered pages for the DOCX editor

use quick_xml::escape::escape;
use crate::services::Conversion;

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f6fb; }
header { background: #0a0f24; color: white; padding: 16px 32px; }
main { max-width: 960px; margin: 32px auto; padding: 0 16px; }
.flash { background: #ffe8e8; border: 1px solid #e0a0a0; padding: 12px; border-radius: 6px; }
.warnings { background: #fff7e0; border: 1px solid #e8d08a; padding: 12px; border-radius: 6px; }
.preview { background: white; border: 1px solid #ccd; padding: 24px; border-radius: 6px; }
textarea { width: 100%; min-height: 360px; font-family: monospace; }
button { background: #2b5cff; color: white; border: 0; padding: 10px 18px; border-radius: 6px; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <header><h1>{title}</h1></header>
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
        css = CSS,
        body = body,
    )
}

/// Upload form, with an optional flash message
pub fn upload_page(flash: Option<&str>) -> String {
    let flash_html = flash
        .map(|msg| format!(r#"<p class="flash">{}</p>"#, escape(msg)))
        .unwrap_or_default();

    layout(
        "Editor de Documentos",
        &format!(
            r#"{flash}
        <form action="/documents/upload" method="post" enctype="multipart/form-data">
            <input type="file" name="file" accept=".docx">
            <button type="submit">Enviar</button>
        </form>"#,
            flash = flash_html
        ),
    )
}

/// Editing view for a converted document
pub fn edit_page(conversion: &Conversion, original_filename: &str) -> String {
    let warnings_html = if conversion.warnings.is_empty() {
        String::new()
    } else {
        let items: String = conversion
            .warnings
            .iter()
            .map(|w| format!("<li>{}</li>", escape(w)))
            .collect();
        format!(r#"<div class="warnings"><ul>{}</ul></div>"#, items)
    };

    layout(
        "Editar Documento",
        &format!(
            r#"{warnings}
        <section class="preview">{preview}</section>
        <form action="/documents/export" method="post">
            <input type="hidden" name="original_filename" value="{filename}">
            <textarea name="html_content">{source}</textarea>
            <button type="submit">Baixar DOCX</button>
        </form>"#,
            warnings = warnings_html,
            preview = conversion.html,
            filename = escape(original_filename),
            source = escape(&conversion.html),
        ),
    )
}
