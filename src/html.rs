//! Self-contained HTML viewer page for the generated document.
//!
//! Pure presentation: the document is embedded as JSON and rendered with
//! Swagger UI loaded from a CDN, styled with a dark theme.

use crate::document::OpenApiDocument;
use anyhow::{Context, Result};

const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta content="width=device-width, initial-scale=1.0" name="viewport">
  <title>{{TITLE}} - API Documentation</title>
  <link href="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui.css" rel="stylesheet" type="text/css" />
  <style>
    html {
      box-sizing: border-box;
      overflow-y: scroll;
    }

    *, *:before, *:after {
      box-sizing: inherit;
    }

    body {
      margin: 0;
      background: #1a1a1a;
      color: #e8e8e8;
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    }

    .swagger-ui {
      background: #1a1a1a !important;
      color: #e8e8e8 !important;
    }

    .swagger-ui .info {
      background: #2d2d2d;
      border: 1px solid #404040;
      border-radius: 8px;
      padding: 20px;
      margin-bottom: 20px;
    }

    .swagger-ui .info .title {
      color: #00d4aa !important;
    }

    .swagger-ui .info .description {
      color: #b8b8b8 !important;
    }

    .swagger-ui .opblock {
      background: #2d2d2d !important;
      border: 1px solid #404040 !important;
      border-radius: 8px !important;
      margin-bottom: 12px !important;
    }

    .swagger-ui .opblock-summary {
      background: #333333 !important;
      border-bottom: 1px solid #404040 !important;
    }

    .swagger-ui .scheme-container {
      background: #2d2d2d !important;
      box-shadow: none !important;
    }
  </style>
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-bundle.js"></script>
  <script>
    const spec = {{SPEC_JSON}};
    window.onload = () => {
      SwaggerUIBundle({
        spec,
        dom_id: '#swagger-ui',
        presets: [SwaggerUIBundle.presets.apis],
        layout: 'BaseLayout'
      });
    };
  </script>
</body>
</html>
"#;

/// Renders the viewer page with the document embedded as JSON.
pub fn render_viewer_page(document: &OpenApiDocument) -> Result<String> {
    let spec_json = serde_json::to_string_pretty(document)
        .context("Failed to serialize OpenAPI document for the HTML viewer")?;

    Ok(VIEWER_TEMPLATE
        .replace("{{TITLE}}", &document.info.title)
        .replace("{{SPEC_JSON}}", &spec_json))
}
