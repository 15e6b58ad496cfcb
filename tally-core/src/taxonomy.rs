//! Display taxonomy: names, presentation metadata and informational
//! subcategory lists. Not consulted while scoring.

use serde::Serialize;
use std::collections::HashSet;

use crate::category::CategoryId;
use crate::error::TaxonomyError;

/// Opaque presentation tokens handed to UI collaborators unchanged.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Presentation {
    pub icon: &'static str,
    pub color: &'static str,
}

/// One taxonomy entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransactionCategory {
    pub id: CategoryId,
    pub name: &'static str,
    #[serde(flatten)]
    pub presentation: Presentation,
    /// Informational only; rule subcategories are not checked against it.
    pub subcategories: &'static [&'static str],
}

const fn entry(
    id: CategoryId,
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    subcategories: &'static [&'static str],
) -> TransactionCategory {
    TransactionCategory {
        id,
        name,
        presentation: Presentation { icon, color },
        subcategories,
    }
}

const BUILTIN: [TransactionCategory; 13] = [
    entry(
        CategoryId::Income,
        "Income",
        "wallet",
        "emerald-500",
        &["Salario", "Pensión", "Reembolsos", "Intereses", "Other Income"],
    ),
    entry(
        CategoryId::Food,
        "Food & Dining",
        "utensils",
        "orange-500",
        &["Supermercados", "Restaurantes", "Cafeterías", "Delivery"],
    ),
    entry(
        CategoryId::Transport,
        "Transport",
        "car",
        "sky-500",
        &["Combustible", "Transporte público", "Taxi", "Parking", "Peajes"],
    ),
    entry(
        CategoryId::Housing,
        "Housing",
        "home",
        "amber-600",
        &["Alquiler", "Hipoteca", "Comunidad"],
    ),
    entry(
        CategoryId::Bills,
        "Bills & Utilities",
        "receipt",
        "yellow-500",
        &["Electricidad y gas", "Agua", "Telefonía e Internet", "Seguros"],
    ),
    entry(
        CategoryId::Shopping,
        "Shopping",
        "shopping-bag",
        "pink-500",
        &["Online", "Ropa", "Electrónica", "Hogar", "Grandes almacenes"],
    ),
    entry(
        CategoryId::Entertainment,
        "Entertainment",
        "film",
        "violet-500",
        &["Streaming", "Cine", "Eventos", "Videojuegos"],
    ),
    entry(
        CategoryId::Health,
        "Health",
        "heart-pulse",
        "red-500",
        &["Farmacia", "Médico", "Seguro médico", "Gimnasio"],
    ),
    entry(
        CategoryId::Education,
        "Education",
        "graduation-cap",
        "indigo-500",
        &["Matrícula", "Cursos", "Libros"],
    ),
    entry(
        CategoryId::Travel,
        "Travel",
        "plane",
        "cyan-500",
        &["Vuelos", "Alojamiento", "Tren"],
    ),
    entry(
        CategoryId::Transfers,
        "Transfers",
        "arrow-left-right",
        "slate-500",
        &["Bizum", "Transferencias"],
    ),
    entry(
        CategoryId::Fees,
        "Fees & Taxes",
        "landmark",
        "stone-500",
        &["Comisiones", "Impuestos"],
    ),
    entry(
        CategoryId::Other,
        "Other",
        "circle-help",
        "gray-400",
        &["General", "Uncategorized"],
    ),
];

/// Ordered, read-only set of taxonomy entries. Always ends with `other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    entries: Vec<TransactionCategory>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Taxonomy {
    /// The embedded taxonomy covering every [`CategoryId`].
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
        }
    }

    /// Build a taxonomy from explicit entries.
    ///
    /// Ids must be unique and the `other` fallback must be present as the
    /// final entry. Entries may omit ids; rules that target a missing id are
    /// rejected when the rule tables are built.
    pub fn new(entries: Vec<TransactionCategory>) -> Result<Self, TaxonomyError> {
        let mut seen = HashSet::new();
        for e in &entries {
            if !seen.insert(e.id) {
                return Err(TaxonomyError::DuplicateCategory(e.id));
            }
        }
        if entries.last().is_some_and(|e| e.id.is_fallback()) {
            Ok(Self { entries })
        } else if seen.contains(&CategoryId::Other) {
            Err(TaxonomyError::FallbackNotLast)
        } else {
            Err(TaxonomyError::MissingFallback)
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&TransactionCategory> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Look up by string id. Unknown ids yield `None`.
    pub fn category(&self, id: &str) -> Option<&TransactionCategory> {
        id.parse::<CategoryId>().ok().and_then(|id| self.get(id))
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.get(id).is_some()
    }

    /// All entries in display order.
    pub fn list(&self) -> &[TransactionCategory] {
        &self.entries
    }

    /// The `other` entry.
    pub fn fallback(&self) -> &TransactionCategory {
        // `new` and `builtin` both guarantee a trailing `other` entry.
        &self.entries[self.entries.len() - 1]
    }

    /// Color token for `id`, or the fallback's when `id` is unknown.
    pub fn color_of(&self, id: &str) -> &'static str {
        self.category(id)
            .unwrap_or_else(|| self.fallback())
            .presentation
            .color
    }

    /// Icon token for `id`, or the fallback's when `id` is unknown.
    pub fn icon_of(&self, id: &str) -> &'static str {
        self.category(id)
            .unwrap_or_else(|| self.fallback())
            .presentation
            .icon
    }
}
