use std::fmt;

const GEMINI_MODELS: &[&str] = &[
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-pro",
    "gemini-1.5-flash",
];

const GROQ_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
    "gemma2-9b-it",
];

/// Remote text-generation vendors the explainer can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// Google Gemini: the whole prompt travels as one user turn.
    #[default]
    Gemini,
    /// Groq: OpenAI-compatible chat with separate system and user roles.
    Groq,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::Groq];

    pub fn id(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::Groq => "Groq",
        }
    }

    /// Models offered by the form, default first.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::Gemini => GEMINI_MODELS,
            Self::Groq => GROQ_MODELS,
        }
    }

    pub fn default_model(self) -> &'static str {
        self.models()[0]
    }

    pub fn api_key_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://aistudio.google.com/app/apikey",
            Self::Groq => "https://console.groq.com",
        }
    }

    pub fn troubleshooting_tips(self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &[
                "Make sure your API key is correct.",
                "Visit Google AI Studio (https://aistudio.google.com) to verify your key.",
                "Try the Groq provider instead.",
            ],
            Self::Groq => &[
                "Make sure your API key is correct.",
                "Visit the Groq Console (https://console.groq.com) to verify your key.",
            ],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
