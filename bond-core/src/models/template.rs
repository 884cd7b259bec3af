use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::brand::BrandConfig;

/// Categories offered when saving a template. Free text is still accepted.
pub const TEMPLATE_CATEGORIES: [&str; 5] = [
    "Investment Bonds",
    "Structured Products",
    "ISA Products",
    "Pension Plans",
    "Unit Trusts",
];

/// A named, reusable branding snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub data: BrandConfig,
    pub created_at: NaiveDate,
}

fn builtin(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    created_at: (i32, u32, u32),
    data: BrandConfig,
) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        data,
        created_at: NaiveDate::from_ymd_opt(created_at.0, created_at.1, created_at.2)
            .unwrap_or_default(),
    }
}

/// The training scenarios shipped with the tool.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        builtin(
            "1",
            "Offshore Bond Training",
            "Standard offshore bond application with UK defensive growth plans",
            "Investment Bonds",
            (2024, 1, 15),
            BrandConfig {
                company_name: "Training Financial Services".to_string(),
                company_address: "123 Training Street, London, UK".to_string(),
                company_phone: "+44 20 1234 5678".to_string(),
                company_email: "training@example.com".to_string(),
                company_website: "www.trainingfinancial.com".to_string(),
                logo_url: String::new(),
                form_title: "Application form for Offshore Bond investment".to_string(),
                closing_date: "5 July 2024".to_string(),
                plan1_name: "UK Defensive Growth Deposit Plan".to_string(),
                plan1_code: "SAN016".to_string(),
                plan2_name: "UK Step Down Kick-out Deposit Plan".to_string(),
                plan2_code: "SAN018".to_string(),
                plan3_name: "UK Growth Deposit Plan".to_string(),
                plan3_code: "SAN017".to_string(),
            },
        ),
        builtin(
            "2",
            "Structured Products",
            "Structured product applications with capital protection features",
            "Structured Products",
            (2024, 1, 20),
            BrandConfig {
                company_name: "Capital Solutions Ltd".to_string(),
                company_address: "456 Investment Avenue, Edinburgh, UK".to_string(),
                company_phone: "+44 131 987 6543".to_string(),
                company_email: "products@capitalsolutions.co.uk".to_string(),
                company_website: "www.capitalsolutions.co.uk".to_string(),
                logo_url: String::new(),
                form_title: "Structured Product Investment Application".to_string(),
                closing_date: "15 August 2024".to_string(),
                plan1_name: "FTSE 100 Capital Protected Plan".to_string(),
                plan1_code: "CP001".to_string(),
                plan2_name: "European Growth Barrier Plan".to_string(),
                plan2_code: "EGB002".to_string(),
                plan3_name: "Global Equity Autocall Plan".to_string(),
                plan3_code: "GEA003".to_string(),
            },
        ),
        builtin(
            "3",
            "ISA Investment",
            "Individual Savings Account investment application forms",
            "ISA Products",
            (2024, 2, 1),
            BrandConfig {
                company_name: "Premier ISA Managers".to_string(),
                company_address: "789 Savings Road, Manchester, UK".to_string(),
                company_phone: "+44 161 234 5678".to_string(),
                company_email: "isa@premierisa.co.uk".to_string(),
                company_website: "www.premierisa.co.uk".to_string(),
                logo_url: String::new(),
                form_title: "Stocks & Shares ISA Application Form".to_string(),
                closing_date: "31 March 2024".to_string(),
                plan1_name: "Balanced Growth ISA Portfolio".to_string(),
                plan1_code: "ISA001".to_string(),
                plan2_name: "Conservative Income ISA Plan".to_string(),
                plan2_code: "ISA002".to_string(),
                plan3_name: "Aggressive Growth ISA Fund".to_string(),
                plan3_code: "ISA003".to_string(),
            },
        ),
    ]
}
