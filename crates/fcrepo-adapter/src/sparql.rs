use fcrepo_types::vocab::EBUCORE_NS;
use fcrepo_types::ResourceMetadataToUpdate;

/// Build the SPARQL update that stores file name and mime type on a binary.
///
/// The update inserts two triples about `<>` (the patched resource) and has
/// no DELETE clause, so values already present are left alone.
pub fn sparql_update_body(metadata: &ResourceMetadataToUpdate) -> String {
    format!(
        "PREFIX ebucore: <{EBUCORE_NS}>\n\
         INSERT {{<> ebucore:filename \"{}\" . <> ebucore:hasMimeType \"{}\" .}}\n\
         WHERE {{}}",
        escape_literal(metadata.original_file_name()),
        escape_literal(metadata.mime_type()),
    )
}

/// Escape a value for use inside a double-quoted SPARQL string literal.
fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
