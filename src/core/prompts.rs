//! System instructions for each generation stage

const NO_DOCUMENTS: &str = "No relevant documents found.";

/// Reply used when the model returns nothing for a casual message.
pub const CASUAL_FALLBACK_ANSWER: &str =
    "Hello! How can I help you with admissions, programs, or anything else about the university?";

/// Instructions for greetings and small talk. No evidence is attached.
pub fn casual_prompt() -> String {
    "You are a friendly university support assistant.\n\
     Reply naturally to the user's greeting or casual message.\n\
     Keep it warm, brief and helpful.\n\
     If they seem to have a question in mind, invite them to ask about admissions, \
     programs, or anything else about the university."
        .to_string()
}

/// Knowledge-only instructions used when a hybrid request found no web evidence.
pub fn knowledge_prompt(knowledge: &str) -> String {
    let context = if knowledge.is_empty() {
        "No relevant information found."
    } else {
        knowledge
    };

    format!(
        "You are a helpful university support assistant.\n\
         Answer the user's query using ONLY the context below.\n\
         \n\
         Context:\n\
         {context}"
    )
}

/// Knowledge-only instructions that let the model admit it lacks information.
pub fn knowledge_with_fallback_prompt(knowledge: &str) -> String {
    format!(
        "You are a helpful university support assistant.\n\
         Answer the user's query using ONLY the context below.\n\
         If the answer is not in the context, reply \"I don't have enough information to answer this question.\"\n\
         \n\
         Context:\n\
         {knowledge}"
    )
}

fn knowledge_section(knowledge: &str) -> &str {
    if knowledge.is_empty() {
        NO_DOCUMENTS
    } else {
        knowledge
    }
}

/// Combined-evidence instructions for time-sensitive queries.
pub fn hybrid_prompt(knowledge: &str, web: &str) -> String {
    format!(
        "You are a helpful university support assistant.\n\
         Answer the user's query accurately using the information below.\n\
         \n\
         ## Knowledge Base (pre-indexed):\n\
         {knowledge}\n\
         \n\
         ## Latest from the University Website:\n\
         {web}\n\
         \n\
         Instructions:\n\
         - Prefer the website results for time-sensitive facts (deadlines, events, news)\n\
         - Use the knowledge base for general program and policy information\n\
         - If the sources disagree, mention both and say which one is more recent\n\
         - Do NOT include URLs or links in your answer; sources are shown separately\n\
         - Be concise but complete",
        knowledge = knowledge_section(knowledge),
    )
}

/// Combined-evidence instructions after the knowledge store came up short.
pub fn web_fallback_prompt(knowledge: &str, web: &str) -> String {
    format!(
        "You are a helpful university support assistant.\n\
         Answer the user's query using the information below.\n\
         \n\
         ## Knowledge Base:\n\
         {knowledge}\n\
         \n\
         ## Latest from the University Website:\n\
         {web}\n\
         \n\
         Instructions:\n\
         - Treat the website results as the primary source; they are fresher\n\
         - Do NOT include URLs or links in your answer; sources are shown separately",
        knowledge = knowledge_section(knowledge),
    )
}
