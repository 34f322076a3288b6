//! Recipe costing.
//!
//! Pure arithmetic over a recipe and its resolved ingredient lines. Nothing
//! here touches the database and nothing is persisted: the same inputs always
//! produce the same [`RecipeCost`].

/// Markup factor used when a recipe has none stored.
pub const DEFAULT_MARKUP: f64 = 3.0;

/// Derived financial metrics of a recipe.
///
/// # Examples
///
/// ```rust
/// use engine::RecipeCost;
///
/// // 2 kg of flour bought at 2.00 per kg, the recipe yields 5 portions.
/// let cost = RecipeCost::compute(5.0, None, [(2.0, 2.0)]);
/// assert_eq!(cost.total_cost, 4.0);
/// assert!((cost.cost_per_portion - 0.8).abs() < 1e-12);
/// assert_eq!(cost.markup_factor, 3.0);
/// assert!((cost.suggested_sale_price - 2.4).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecipeCost {
    pub total_cost: f64,
    pub cost_per_portion: f64,
    pub markup_factor: f64,
    pub suggested_sale_price: f64,
}

impl RecipeCost {
    /// Computes the costing of a recipe.
    ///
    /// `lines` yields `(quantity, last_purchase_price)` pairs, one per link.
    /// Duplicate links for the same ingredient simply add up.
    ///
    /// - `total_cost` is the sum of `quantity * price` over all lines.
    /// - `cost_per_portion` is `total_cost / yield_quantity`, or 0 when the
    ///   yield is not positive.
    /// - `markup_factor` is the stored markup, or [`DEFAULT_MARKUP`] when
    ///   none is stored. An explicit 0 stays 0.
    /// - `suggested_sale_price` is `cost_per_portion * markup_factor`.
    #[must_use]
    pub fn compute<I>(yield_quantity: f64, markup: Option<f64>, lines: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let total_cost = total_cost(lines);
        let cost_per_portion = if yield_quantity > 0.0 {
            total_cost / yield_quantity
        } else {
            0.0
        };
        let markup_factor = markup.unwrap_or(DEFAULT_MARKUP);

        Self {
            total_cost,
            cost_per_portion,
            markup_factor,
            suggested_sale_price: cost_per_portion * markup_factor,
        }
    }
}

// Terms are summed in a canonical order so the result does not depend on the
// order the links were fetched in.
fn total_cost<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut terms: Vec<f64> = lines
        .into_iter()
        .map(|(quantity, price)| quantity * price)
        .collect();
    terms.sort_by(f64::total_cmp);
    terms.into_iter().sum()
}
