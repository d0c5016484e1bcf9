//! Scene-understanding prompt assembly
//!
//! The instruction handed to the vision model is a fixed template rendered
//! around a user-context line. Plain string formatting; the parameter exists
//! so deployments can tailor the context, not to vary the contract.

/// Default user context for scene analysis
pub const DEFAULT_USER_CONTEXT: &str =
    "Provide detailed information about the image for a visually impaired user.";

/// Render the scene-understanding instruction for the vision model
///
/// Asks for identified items with their purposes, an overall description,
/// and safety recommendations for a visually impaired user.
#[must_use]
pub fn scene_instruction(user_context: &str) -> String {
    format!(
        "As an AI assistant, you assist visually impaired users by interpreting \
         the content of images.\n\
         User Context: {user_context}\n\n\
         Please provide:\n\
         1. A list of identified items in the image along with their purposes/functions.\n\
         2. Overall description of the image.\n\
         3. Recommendations/Suggestions for actions or safety measures/precautions \
         for the visually impaired."
    )
}
