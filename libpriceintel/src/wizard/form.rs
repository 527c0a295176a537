//! Declarative form definitions
//!
//! A `FormSpec` lists the steps of a wizard and the fields each step owns.
//! Field rules carry both a catalog key and an English message; renderers
//! localize through the key, logs and tests read the message.

use serde::Serialize;

/// Which built-in flow a form drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Purchase,
    Contact,
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormKind::Purchase => f.write_str("purchase"),
            FormKind::Contact => f.write_str("contact"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// Non-empty after trimming
    Required,
    /// `local@domain.tld` shape
    Email,
    /// Value must be one of the listed options
    OneOf { options: Vec<String> },
    /// Character count bounds, inclusive
    Length { min: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub message_key: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub label_key: String,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label_key: format!("form.{}", name),
            rules: Vec::new(),
        }
    }

    fn rule(mut self, kind: RuleKind, suffix: &str, message: &str) -> Self {
        self.rules.push(Rule {
            kind,
            message_key: format!("form.{}.{}", self.name, suffix),
            message: message.to_string(),
        });
        self
    }

    pub fn required(self, message: &str) -> Self {
        self.rule(RuleKind::Required, "required", message)
    }

    pub fn email(self, message: &str) -> Self {
        self.rule(RuleKind::Email, "invalid", message)
    }

    pub fn one_of(self, options: &[&str], message: &str) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        self.rule(RuleKind::OneOf { options }, "invalid", message)
    }

    pub fn length(self, min: usize, max: usize, message: &str) -> Self {
        self.rule(RuleKind::Length { min, max }, "length", message)
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| r.kind == RuleKind::Required)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSpec {
    pub title_key: String,
    pub fields: Vec<FieldSpec>,
}

impl StepSpec {
    pub fn new(title_key: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            title_key: title_key.to_string(),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSpec {
    pub kind: FormKind,
    pub steps: Vec<StepSpec>,
}

pub const INDUSTRIES: &[&str] = &[
    "technology",
    "healthcare",
    "finance",
    "retail",
    "education",
    "manufacturing",
    "other",
];

pub const CONTACT_REASONS: &[&str] = &[
    "pricing",
    "demo",
    "enterprise",
    "support",
    "partnership",
    "other",
];

impl FormSpec {
    /// Build a form; a form without steps gets a single empty step
    pub fn new(kind: FormKind, steps: Vec<StepSpec>) -> Self {
        let steps = if steps.is_empty() {
            vec![StepSpec::new("wizard.step.review", Vec::new())]
        } else {
            steps
        };
        Self { kind, steps }
    }

    /// Account -> payment -> review
    pub fn purchase() -> Self {
        Self::new(
            FormKind::Purchase,
            vec![
                StepSpec::new(
                    "wizard.step.account",
                    vec![
                        FieldSpec::new("firstName").required("Please enter your first name"),
                        FieldSpec::new("lastName").required("Please enter your last name"),
                        FieldSpec::new("email")
                            .required("Please enter your email")
                            .email("Please enter a valid email"),
                        FieldSpec::new("company").required("Please enter your company name"),
                        FieldSpec::new("industry")
                            .one_of(INDUSTRIES, "Please select an industry from the list"),
                    ],
                ),
                StepSpec::new(
                    "wizard.step.payment",
                    vec![
                        FieldSpec::new("cardNumber").required("Please enter your card number"),
                        FieldSpec::new("expiry").required("Please enter expiry date"),
                        FieldSpec::new("cvv").required("Please enter CVV"),
                        FieldSpec::new("cardName").required("Please enter name on card"),
                        FieldSpec::new("billingAddress")
                            .required("Please enter billing address"),
                    ],
                ),
                StepSpec::new("wizard.step.review", Vec::new()),
            ],
        )
    }

    /// Single-step contact message form
    pub fn contact() -> Self {
        Self::new(
            FormKind::Contact,
            vec![StepSpec::new(
                "wizard.step.message",
                vec![
                    FieldSpec::new("firstName").required("Please enter your first name"),
                    FieldSpec::new("lastName").required("Please enter your last name"),
                    FieldSpec::new("email")
                        .required("Please enter your email")
                        .email("Please enter a valid email"),
                    FieldSpec::new("phone"),
                    FieldSpec::new("company"),
                    FieldSpec::new("reason")
                        .required("Please select a reason")
                        .one_of(CONTACT_REASONS, "Please select a reason from the list"),
                    FieldSpec::new("message").required("Please enter your message"),
                ],
            )],
        )
    }

    /// Number of steps, N
    pub fn len(&self) -> u8 {
        u8::try_from(self.steps.len()).unwrap_or(u8::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step `index`, 1-based
    pub fn step(&self, index: u8) -> Option<&StepSpec> {
        if index == 0 {
            return None;
        }
        self.steps.get(usize::from(index) - 1)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }

    /// The 1-based step that owns `name`
    pub fn step_of(&self, name: &str) -> Option<u8> {
        self.steps
            .iter()
            .position(|s| s.fields.iter().any(|f| f.name == name))
            .and_then(|i| u8::try_from(i + 1).ok())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .map(|f| f.name.as_str())
    }
}
