// Resume generation: free-form candidate notes -> one schema-constrained
// request -> validated ResumeDocument, plus a post-hoc quality check.
// All service calls go through llm_client; the credential comes from the session store.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod quality;
