//! The labeled examples the pipeline is fitted on.

use crate::classifier::Category;
use Category::*;

/// One labeled training text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub text: &'static str,
    pub category: Category,
}

const fn example(text: &'static str, category: Category) -> Example {
    Example { text, category }
}

static BUILTIN_EXAMPLES: &[Example] = &[
    example("Where can I get free meals", FoodBank),
    example("Food distribution locations", FoodBank),
    example("Nutrition assistance programs", FoodBank),
    example("Food help for low-income families", FoodBank),
    example("Local food drives", FoodBank),
    example("Food pantry open on weekends", FoodBank),
    example("Free groceries and hot meals", FoodBank),
    example("Soup kitchen lunch service", FoodBank),
    example("Shelters for women and children", Shelter),
    example("Veteran housing assistance", Shelter),
    example("Low-cost temporary shelters", Shelter),
    example("Transitional housing programs", Shelter),
    example("Cold weather shelters", Shelter),
    example("Emergency shelter for homeless families", Shelter),
    example("Shelter for families with kids", Shelter),
    example("Overnight shelter beds tonight", Shelter),
    example("Low-cost dental clinics", Medical),
    example("Mental health services", Medical),
    example("Immunization clinics", Medical),
    example("Health services for uninsured", Medical),
    example("Affordable eye care", Medical),
    example("Free doctor visits and checkups", Medical),
    example("Prescription medication assistance", Medical),
    example("Scholarship programs", Education),
    example("Job readiness training", Education),
    example("Online learning resources", Education),
    example("Reading and literacy programs", Education),
    example("Trade school options", Education),
    example("GED preparation courses", Education),
    example("Tutoring for students after school", Education),
    example("Free fitness classes", Recreation),
    example("Community gardening programs", Recreation),
    example("Art and craft workshops", Recreation),
    example("Music and dance classes", Recreation),
    example("Sports leagues for kids", Recreation),
    example("Swimming pool hours and park activities", Recreation),
    example("Family resource centers", CommunityCenter),
    example("Youth leadership programs", CommunityCenter),
    example("Volunteer opportunities", CommunityCenter),
    example("Community education classes", CommunityCenter),
    example("Local social events", CommunityCenter),
    example("Neighborhood center meeting rooms", CommunityCenter),
    example("Senior center activities and gatherings", CommunityCenter),
    example("Disaster relief services", Other),
    example("Affordable childcare", Other),
    example("Veteran support services", Other),
    example("Assistance with utility bills", Other),
    example("Substance abuse programs", Other),
    example("Legal aid and immigration help", Other),
    example("Transportation vouchers for appointments", Other),
];

/// An ordered, read-only set of labeled examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    examples: Vec<Example>,
}

impl Corpus {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// The compiled-in social-services corpus.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_EXAMPLES.to_vec())
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Categories without a single example, in enumeration order.
    pub fn missing_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| !self.examples.iter().any(|e| e.category == *category))
            .collect()
    }

    /// Number of examples labeled `category`.
    pub fn count(&self, category: Category) -> usize {
        self.examples.iter().filter(|e| e.category == category).count()
    }
}
