//! Pricing plans
//!
//! Choosing a self-serve plan opens a purchase wizard; the enterprise plan
//! goes through the contact form instead.

use serde::Serialize;
use std::str::FromStr;

use crate::error::PriceIntelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Starter,
    Professional,
    Enterprise,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [PlanId::Starter, PlanId::Professional, PlanId::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Starter => "starter",
            PlanId::Professional => "professional",
            PlanId::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = PriceIntelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(PlanId::Starter),
            "professional" => Ok(PlanId::Professional),
            "enterprise" => Ok(PlanId::Enterprise),
            _ => Err(PriceIntelError::InvalidInput(format!(
                "Unknown plan '{}'. Available plans: starter, professional, enterprise",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Price {
    Monthly { usd: u32 },
    Custom,
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Monthly { usd } => write!(f, "${}/month", usd),
            Price::Custom => f.write_str("Custom"),
        }
    }
}

/// What selecting the plan opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Purchase,
    ContactSales,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub price: Price,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
    pub action: PlanAction,
}

impl Plan {
    /// Catalog key of the localized plan name
    pub fn name_key(&self) -> String {
        format!("pricing.{}.name", self.id)
    }

    pub fn button_label(&self) -> &'static str {
        match self.action {
            PlanAction::Purchase => "Start Free Trial",
            PlanAction::ContactSales => "Contact Sales",
        }
    }
}

static PLANS: [Plan; 3] = [
    Plan {
        id: PlanId::Starter,
        name: "Starter",
        price: Price::Monthly { usd: 299 },
        description: "Perfect for small businesses ready to optimize their pricing",
        features: &[
            "Up to 10,000 SKUs",
            "Basic competitor monitoring",
            "Monthly pricing reports",
            "Email alerts",
            "Dashboard analytics",
            "Basic API access",
        ],
        popular: false,
        action: PlanAction::Purchase,
    },
    Plan {
        id: PlanId::Professional,
        name: "Professional",
        price: Price::Monthly { usd: 799 },
        description: "Ideal for growing businesses with complex pricing needs",
        features: &[
            "Up to 50,000 SKUs",
            "Real-time competitor tracking",
            "Dynamic pricing recommendations",
            "Advanced analytics & reports",
            "Custom alerts & notifications",
            "Full API access",
            "Priority support",
            "A/B testing tools",
        ],
        popular: true,
        action: PlanAction::Purchase,
    },
    Plan {
        id: PlanId::Enterprise,
        name: "Enterprise",
        price: Price::Custom,
        description: "For large enterprises with advanced pricing strategies",
        features: &[
            "Unlimited SKUs",
            "Advanced AI pricing models",
            "Custom integrations",
            "Dedicated account manager",
            "White-label solution",
            "On-premise deployment",
            "Custom training & support",
            "SLA guarantee",
        ],
        popular: false,
        action: PlanAction::ContactSales,
    },
];

/// All plans in display order
pub fn plans() -> &'static [Plan] {
    &PLANS
}

pub fn plan(id: PlanId) -> &'static Plan {
    match id {
        PlanId::Starter => &PLANS[0],
        PlanId::Professional => &PLANS[1],
        PlanId::Enterprise => &PLANS[2],
    }
}
