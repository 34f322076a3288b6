//! Recipe costing engine.
//!
//! The engine owns ingredients, recipes ("fichas técnicas") and the weighted
//! links between them. Every operation is scoped to the acting user, and
//! costing metrics are derived on demand by [`RecipeCost::compute`].

pub use commands::{
    IngredientNew, IngredientUpdate, ProductionOrderNew, RecipeIngredientNew, RecipeNew,
    RecipeUpdate,
};
pub use costing::{DEFAULT_MARKUP, RecipeCost};
pub use error::EngineError;
pub use ingredients::Ingredient;
pub use ops::{Engine, EngineBuilder, InventoryStatistics};
pub use production_orders::ProductionOrder;
pub use recipe_ingredients::RecipeIngredient;
pub use recipes::{Recipe, RecipeDetail};

mod commands;
mod costing;
mod error;
mod ingredients;
mod ops;
mod production_orders;
mod recipe_ingredients;
mod recipes;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
