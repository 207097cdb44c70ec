//! Prompt construction for the enrichment providers.
//!
//! Providers do not send whole route files to the model. The handler
//! implementation for the method under documentation is sliced out of the
//! file text first, and the prompt wraps just that snippet together with the
//! response format the rest of the pipeline expects.

use crate::extractor::HttpMethod;
use regex::Regex;

/// Extracts the implementation of one HTTP method handler from a route
/// file's text.
///
/// Two export shapes are recognized: function declarations
/// (`export async function GET(...) { ... }`) and arrow-function bindings
/// (`export const GET = async (...) => { ... }`). Both are reconstructed as
/// a canonical async function declaration so the prompt always carries the
/// same shape. Returns `None` when the method has no recognizable
/// implementation in the file.
pub fn extract_method_implementation(file_text: &str, method: HttpMethod) -> Option<String> {
    let name = method.as_upper_str();

    let function_pattern = Regex::new(&format!(
        r"(?i)export\s+(?:async\s+)?function\s+{}\s*\(([\s\S]*?)\)\s*(?::\s*[^\{{]*)?\{{([\s\S]*?)\n\}}",
        name
    ))
    .expect("function pattern is valid");

    if let Some(captures) = function_pattern.captures(file_text) {
        let params = captures.get(1).map_or("", |m| m.as_str()).trim();
        let body = captures.get(2).map_or("", |m| m.as_str());
        if !body.is_empty() {
            return Some(format!(
                "export async function {}({}) {{{}\n}}",
                name, params, body
            ));
        }
    }

    let arrow_pattern = Regex::new(&format!(
        r"(?i)export\s+(?:const|let|var)\s+{}\s*=\s*(?:async\s+)?\(([\s\S]*?)\)\s*(?::\s*[^=]*)?=>\s*\{{([\s\S]*?)\n\}}",
        name
    ))
    .expect("arrow pattern is valid");

    if let Some(captures) = arrow_pattern.captures(file_text) {
        let params = captures.get(1).map_or("", |m| m.as_str()).trim();
        let body = captures.get(2).map_or("", |m| m.as_str());
        if !body.is_empty() {
            return Some(format!(
                "export async function {}({}) {{{}\n}}",
                name, params, body
            ));
        }
    }

    None
}

/// Builds the model prompt for one route operation.
///
/// The response format section mirrors what [`crate::provider::parse_operation`]
/// deserializes; keep the two in sync.
pub fn build_prompt(route: &str, method_implementation: &str) -> String {
    format!(
        r#"You are generating the OpenAPI documentation for the API route "{route}".
This is the handler implementation:

```typescript
{method_implementation}
```

Return valid JSON only in this format:
{{
  "summary": "Concise endpoint purpose (max 10 words)",
  "description": "Brief explanation of functionality, parameters, and purpose",
  "parameters": [
    {{
      "name": "parameterName",
      "in": "query|path|body|header",
      "required": true|false,
      "schema": {{
        "type": "string|number|boolean|array|object|null",
        "nullable": true|false
      }},
      "example": "example value"
    }}
  ]
}}

Follow these rules:
1. Ignore framework request/response wrapper types (NextRequest, NextResponse)
2. Analyze the function body for used parameters
3. Query parameters: extracted from the URL/searchParams (e.g. searchParams.get('id'))
4. Path parameters: found in the function signature ({{params: {{id: string}}}}) or the route path (e.g. '/hotel/{{id}}/...')
5. Body parameters: parsed from the request body (e.g. await request.json())
6. Check whether parameters are required or optional"#
    )
}
