use crate::db::models::Recipe;

/// Text column of a recipe that containment predicates apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Instructions,
}

impl TextField {
    /// Column holding the case-folded text
    pub fn folded_column(self) -> &'static str {
        match self {
            TextField::Name => "name_folded",
            TextField::Instructions => "instructions_folded",
        }
    }

    fn value(self, recipe: &Recipe) -> &str {
        match self {
            TextField::Name => &recipe.name,
            TextField::Instructions => &recipe.instructions,
        }
    }
}

/// One constraint of a search. A store conjoins every predicate it is
/// given; how each one is executed is up to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field contains `text`, ignoring case
    TextContains {
        field: TextField,
        text: String,
        negated: bool,
    },
    /// Some owned ingredient is named `name`, ignoring case.
    /// Negated: no owned ingredient is.
    HasIngredient { name: String, negated: bool },
    Vegetarian(bool),
}

impl Predicate {
    /// Evaluate against a fully loaded recipe
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Predicate::TextContains {
                field,
                text,
                negated,
            } => {
                let haystack = fold_case(field.value(recipe));
                haystack.contains(&fold_case(text)) != *negated
            }
            Predicate::HasIngredient { name, negated } => {
                let wanted = fold_case(name);
                let found = recipe
                    .ingredients
                    .iter()
                    .any(|i| fold_case(&i.name) == wanted);
                found != *negated
            }
            Predicate::Vegetarian(vegetarian) => recipe.vegetarian == *vegetarian,
        }
    }
}

/// Result ordering applied before paging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Id,
    /// Name, then id for recipes sharing a name
    Name,
}

/// Case folding shared by every store, so non-ASCII text matches alike
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escape `%`, `_` and the escape character itself for `LIKE ... ESCAPE '\'`
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
