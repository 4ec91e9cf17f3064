use crate::display::POLICY_LIST_HEADING;
use crate::models::{ApplicantProfile, PremiumRequest, SearchResult, yes_no};
use crate::premium::PremiumEstimate;

/// Search hits handed to the model; it picks the best 7 of these
pub const MAX_PROMPT_RESULTS: usize = 10;

pub const LOW_INCOME_NOTE: &str = "⚠️ The user has a very low income. Please recommend only affordable policies with low premiums and basic coverage.";
pub const MODERATE_INCOME_NOTE: &str = "⚠️ Moderate income. Keep premiums under ₹1000/month and coverage under ₹5 lakh if possible.";

pub const SUPPORT_PERSONA_PROMPT: &str = r#"You are a helpful and experienced customer support agent for an insurance company.
Answer questions briefly, clearly, and accurately. Use real-world examples where helpful."#;

const ADVISOR_INTRO: &str = r#"You are an experienced and responsible insurance advisor.

Your task is to:
1. Analyze the user profile and risk factors.
2. Filter and recommend the **top 7 most suitable insurance policies** from the search results.
3. Justify each recommendation clearly."#;

const UNDERWRITING_FORMAT: &str = r#"### 🛡️ Underwriting Decision:
- **Risk Category**: Low / Medium / High
- **Eligible for**: <List of suitable insurance types>
- **Exclusions (if any)**: ...
- **Suggested Coverage**: ...
- **Suggested Premium**: ..."#;

/// Card lines end in two spaces so markdown keeps them as separate lines
const POLICY_LIST_FORMAT: &str = concat!(
    "1. **<Policy Name 1>**  \n",
    "   🔗 [Link](<URL>)  \n",
    "   💸 **Premium**: <₹ amount / N/A>  \n",
    "   💼 **Coverage**: <Coverage details or N/A>  \n",
    "   📊 **Claim Ratio**: <Ratio or N/A>  \n",
    "   📝 **Reason**: <Explain why this policy fits the user based on risk, income, preference, etc.>\n",
    "\n",
    "2. **<Policy Name 2>**  \n",
    "   🔗 [Link](<URL>)  \n",
    "   💸 **Premium**: ...  \n",
    "   💼 **Coverage**: ...  \n",
    "   📊 **Claim Ratio**: ...  \n",
    "   📝 **Reason**: ...\n",
    "\n",
    "...and so on till 7.",
);

/// Budget guidance for the model, empty above the moderate band
pub fn affordability_note(income: f64) -> &'static str {
    if income < 100_000.0 {
        LOW_INCOME_NOTE
    } else if income < 350_000.0 {
        MODERATE_INCOME_NOTE
    } else {
        ""
    }
}

/// Free-text web query describing the applicant
pub fn build_search_query(profile: &ApplicantProfile) -> String {
    format!(
        "best insurance policy in India for {} year old {} {} with income {}",
        profile.age, profile.occupation, profile.gender, profile.income
    )
}

fn format_search_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .take(MAX_PROMPT_RESULTS)
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n{}\nLink: {}\n", i + 1, r.title, r.snippet, r.link))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_profile(profile: &ApplicantProfile) -> String {
    profile
        .attributes()
        .into_iter()
        .map(|(label, value)| format!("- {label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Underwriting + top-7 instruction block for the recommendation flow
pub fn build_recommendation_prompt(profile: &ApplicantProfile, results: &[SearchResult]) -> String {
    format!(
        "{ADVISOR_INTRO}\n\n\
         User Profile:\n{profile}\n\n\
         {note}\n\n\
         Search Results:\n{results}\n\n\
         Respond strictly in this format:\n\n\
         {UNDERWRITING_FORMAT}\n\n\
         {POLICY_LIST_HEADING}\n\n\
         {POLICY_LIST_FORMAT}\n",
        profile = format_profile(profile),
        note = affordability_note(profile.income),
        results = format_search_results(results),
    )
}

pub fn build_support_prompt(question: &str) -> String {
    format!("{SUPPORT_PERSONA_PROMPT}\n\nUser: {question}\n\nAgent:")
}

pub fn build_premium_explanation_prompt(
    request: &PremiumRequest,
    estimate: &PremiumEstimate,
) -> String {
    format!(
        r#"A user is estimating insurance premium for a {plan}.

Details:
- Age: {age}
- Income: ₹{income}
- Smoker: {smoker}
- Driving Record: {driving}
- Risk Score: {score}
- Desired Coverage: ₹{coverage}

Given these factors, the estimated monthly premium is {monthly}.
Explain in simple language how this was calculated and what influences the price.
"#,
        plan = request.plan_type,
        age = request.age,
        income = request.income,
        smoker = yes_no(request.smoker),
        driving = request.driving_record,
        score = estimate.risk_score,
        coverage = request.coverage,
        monthly = estimate.monthly_display(),
    )
}
