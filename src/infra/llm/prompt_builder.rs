/// Fixed tutor instructions. Identical for every provider.
pub const TUTOR_PREAMBLE: &str = concat!(
    "You are an expert DSA (Data Structures & Algorithms) tutor. \n",
    "Your job is to explain DSA problems in simple, clear language that anyone can understand.\n",
    "\n",
    "For each problem, provide:\n",
    "1. Problem Summary: A brief overview in simple words\n",
    "2. Key Concepts: What data structures or algorithms are involved\n",
    "3. Approach: Step-by-step explanation of how to solve it\n",
    "4. Time & Space Complexity: Big O notation with explanation\n",
    "5. Example Walkthrough: A small example showing the solution\n",
    "6. Tips: Common pitfalls or edge cases to consider\n",
    "\n",
    "Use analogies and simple language. Avoid jargon unless you explain it.",
);

pub const USER_LEAD_IN: &str = "Explain this DSA problem:\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainPrompt {
    pub system: String,
    pub user: String,
}

impl ExplainPrompt {
    /// Single-turn form for providers without a system role.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// The problem text is embedded verbatim; callers validate emptiness.
    pub fn build(problem_text: &str) -> ExplainPrompt {
        ExplainPrompt {
            system: TUTOR_PREAMBLE.to_string(),
            user: format!("{USER_LEAD_IN}{problem_text}"),
        }
    }
}
