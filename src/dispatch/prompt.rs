//! Prompt templates sent to the model.
//!
//! The wording is kept stable: answers are compared across sessions and the
//! context prompt is what keeps the model from answering outside the
//! uploaded documents.

/// Prompt used for image requests when the caller gives no question.
pub const DEFAULT_IMAGE_PROMPT: &str =
    "Please extract all text content from this image and describe what you see.";

/// Builds the prompt answering `question` strictly from `context`.
#[must_use]
pub fn build_context_prompt(context: &str, question: &str) -> String {
    format!(
        "Based on the following document content, please answer the user's question:\n\n\
         Context: {context}\n\n\
         Question: {question}\n\n\
         Please provide a detailed and accurate answer based only on the information \
         provided in the context."
    )
}

/// Builds the prompt for an image request.
///
/// Blank questions fall back to [`DEFAULT_IMAGE_PROMPT`].
#[must_use]
pub fn build_image_prompt(question: Option<&str>) -> String {
    question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_IMAGE_PROMPT)
        .to_string()
}

/// Builds the summary prompt over text extracted from a PDF.
#[must_use]
pub fn build_pdf_prompt(extracted_text: &str) -> String {
    format!(
        "Please analyze this PDF content and extract all relevant information including \
         text and any image descriptions:\n\n\
         Text Content: {extracted_text}\n\n\
         Please provide a comprehensive summary of all the information in this document."
    )
}
