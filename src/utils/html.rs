use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Quiz questions may carry light formatting (<b>, <i>, <code>), so this keeps
/// whitelisted tags and drops <script>, <iframe> and event-handler attributes.
/// Answers are compared as plain text and are never passed through here.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
