use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millbook_core::{
    ensure_non_negative, ensure_positive, DomainError, DomainResult, EntityId, TenantId,
    TenantScoped,
};
use millbook_materials::MaterialId;

/// Product identifier. Also keys the product's finished-goods inventory item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One bill-of-materials line: material consumed per unit produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub material_id: MaterialId,
    pub material_name: String,
    pub quantity_per_unit: f64,
}

/// Ledger entity: sellable product with its bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub org_id: TenantId,
    pub name: String,
    pub unit_price: f64,
    pub bom: Vec<BomLine>,
    pub created_at: DateTime<Utc>,
}

/// Expanded material requirement for one production run.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRequirement {
    pub material_id: MaterialId,
    pub material_name: String,
    pub required: f64,
}

impl Product {
    /// Catalog a new product.
    ///
    /// The BOM may be empty (a resale-only product), but a product without a
    /// BOM cannot be produced. Referenced materials are resolved at
    /// production time, not here.
    pub fn create(
        org_id: TenantId,
        name: impl Into<String>,
        unit_price: f64,
        bom: Vec<BomLine>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        ensure_non_negative("unit price", unit_price)?;

        for line in &bom {
            ensure_positive("quantity per unit", line.quantity_per_unit)?;
            if line.material_name.trim().is_empty() {
                return Err(DomainError::validation("material name cannot be empty"));
            }
        }
        // Two lines for the same material would collapse into one document
        // write at production time, losing the first deduction.
        for (idx, line) in bom.iter().enumerate() {
            if bom[..idx].iter().any(|l| l.material_id == line.material_id) {
                return Err(DomainError::validation(format!(
                    "duplicate material in bill of materials: {}",
                    line.material_name
                )));
            }
        }

        Ok(Self {
            id: ProductId::new(EntityId::new()),
            org_id,
            name,
            unit_price,
            bom,
            created_at,
        })
    }

    /// Expand the BOM into per-material requirements for a run of
    /// `produced_qty` units.
    pub fn requirements(&self, produced_qty: f64) -> DomainResult<Vec<MaterialRequirement>> {
        ensure_positive("production quantity", produced_qty)?;
        if self.bom.is_empty() {
            return Err(DomainError::validation(format!(
                "product {} has no bill of materials",
                self.name
            )));
        }

        Ok(self
            .bom
            .iter()
            .map(|line| MaterialRequirement {
                material_id: line.material_id,
                material_name: line.material_name.clone(),
                required: line.quantity_per_unit * produced_qty,
            })
            .collect())
    }
}

impl TenantScoped for Product {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}

/// Completed-run status. Runs are recorded only after they commit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionStatus {
    Completed,
}

/// Append-only record of a completed production run.
///
/// Immutable once created; identity and timestamp are store-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub org_id: TenantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: f64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub status: ProductionStatus,
}

impl ProductionOrder {
    pub fn completed(
        product: &Product,
        quantity: f64,
        total_cost: f64,
        unit_cost: f64,
    ) -> Self {
        Self {
            org_id: product.org_id,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            total_cost,
            unit_cost,
            status: ProductionStatus::Completed,
        }
    }
}

impl TenantScoped for ProductionOrder {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}
