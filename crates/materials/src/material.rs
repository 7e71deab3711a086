use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millbook_core::{
    ensure_non_negative, ensure_positive, DomainError, DomainResult, EntityId, TenantId,
    TenantScoped,
};
use millbook_costing::weighted_average;

/// Raw-material identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub EntityId);

impl MaterialId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Unit of measure for a raw material.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    Ltr,
    Pc,
    Mtr,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Ltr => "ltr",
            Unit::Pc => "pc",
            Unit::Mtr => "mtr",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Unit::Kg),
            "ltr" => Ok(Unit::Ltr),
            "pc" => Ok(Unit::Pc),
            "mtr" => Ok(Unit::Mtr),
            other => Err(DomainError::validation(format!("unknown unit: {other}"))),
        }
    }
}

/// Ledger entity: raw material with running weighted-average cost.
///
/// Mutated only through the pure transitions below; quantity never goes
/// negative and the average cost reflects every purchase rolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    pub id: MaterialId,
    pub org_id: TenantId,
    pub name: String,
    pub unit: Unit,
    pub quantity: f64,
    pub average_cost: f64,
    pub min_stock: f64,
    pub created_at: DateTime<Utc>,
}

/// Result of rolling a purchase into a material.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseApplied {
    pub material: RawMaterial,
    pub unit_cost: f64,
}

impl RawMaterial {
    /// Catalog a new material at zero stock and zero cost.
    pub fn create(
        org_id: TenantId,
        name: impl Into<String>,
        unit: Unit,
        min_stock: f64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("material name cannot be empty"));
        }
        ensure_non_negative("minimum stock", min_stock)?;

        Ok(Self {
            id: MaterialId::new(EntityId::new()),
            org_id,
            name,
            unit,
            quantity: 0.0,
            average_cost: 0.0,
            min_stock,
            created_at,
        })
    }

    /// Roll a purchase into the running average.
    ///
    /// `total_cost` is the money spent for the whole batch; a zero-cost batch
    /// is valid (free stock dilutes the average).
    pub fn receive_purchase(&self, quantity: f64, total_cost: f64) -> DomainResult<PurchaseApplied> {
        ensure_positive("purchase quantity", quantity)?;
        ensure_non_negative("purchase cost", total_cost)?;

        let unit_cost = total_cost / quantity;
        let roll = weighted_average(self.quantity, self.average_cost, quantity, unit_cost);

        let mut material = self.clone();
        material.quantity = roll.quantity;
        material.average_cost = roll.average_cost;

        Ok(PurchaseApplied {
            material,
            unit_cost,
        })
    }

    /// Deduct a production requirement. Consumption does not change the
    /// average cost, only the quantity.
    pub fn consume(&self, required: f64) -> DomainResult<Self> {
        ensure_positive("required quantity", required)?;
        if self.quantity < required {
            return Err(DomainError::insufficient_stock(
                self.name.clone(),
                required,
                self.quantity,
            ));
        }

        let mut material = self.clone();
        material.quantity -= required;
        Ok(material)
    }

    /// Apply a signed manual correction.
    pub fn adjust(&self, delta: f64) -> DomainResult<Self> {
        if !delta.is_finite() {
            return Err(DomainError::validation("adjustment must be finite"));
        }
        if delta == 0.0 {
            return Err(DomainError::validation("adjustment cannot be zero"));
        }

        let new_quantity = self.quantity + delta;
        if new_quantity < 0.0 {
            return Err(DomainError::insufficient_stock(
                self.name.clone(),
                -delta,
                self.quantity,
            ));
        }

        let mut material = self.clone();
        material.quantity = new_quantity;
        Ok(material)
    }

    /// At or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

impl TenantScoped for RawMaterial {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}

/// Movement type recorded against a raw material.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialLogKind {
    Purchase,
    ProductionUse,
    ManualAdd,
    ManualDeduct,
}

/// Audit record: one per material mutation, appended in the same commit.
///
/// `new_quantity`/`new_average_cost` snapshot the material after the mutation
/// so history can be read without replaying. Identity and the timestamp are
/// assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLog {
    pub org_id: TenantId,
    pub material_id: MaterialId,
    pub material_name: String,
    pub kind: MaterialLogKind,
    pub quantity_change: f64,
    pub total_cost: Option<f64>,
    pub unit_cost: Option<f64>,
    pub product_name: Option<String>,
    pub reason: Option<String>,
    pub new_quantity: f64,
    pub new_average_cost: f64,
}

impl MaterialLog {
    /// Purchase movement (`+quantity`), taken from the already-updated
    /// material.
    pub fn purchase(material: &RawMaterial, quantity: f64, total_cost: f64, unit_cost: f64) -> Self {
        Self {
            org_id: material.org_id,
            material_id: material.id,
            material_name: material.name.clone(),
            kind: MaterialLogKind::Purchase,
            quantity_change: quantity,
            total_cost: Some(total_cost),
            unit_cost: Some(unit_cost),
            product_name: None,
            reason: None,
            new_quantity: material.quantity,
            new_average_cost: material.average_cost,
        }
    }

    /// Production consumption (`-consumed`) for the named product.
    pub fn production_use(material: &RawMaterial, consumed: f64, product_name: &str) -> Self {
        Self {
            org_id: material.org_id,
            material_id: material.id,
            material_name: material.name.clone(),
            kind: MaterialLogKind::ProductionUse,
            quantity_change: -consumed,
            total_cost: None,
            unit_cost: None,
            product_name: Some(product_name.to_string()),
            reason: None,
            new_quantity: material.quantity,
            new_average_cost: material.average_cost,
        }
    }

    /// Manual correction; the kind follows the sign of `delta`.
    pub fn manual_adjustment(material: &RawMaterial, delta: f64, reason: &str) -> Self {
        let kind = if delta >= 0.0 {
            MaterialLogKind::ManualAdd
        } else {
            MaterialLogKind::ManualDeduct
        };
        Self {
            org_id: material.org_id,
            material_id: material.id,
            material_name: material.name.clone(),
            kind,
            quantity_change: delta,
            total_cost: None,
            unit_cost: None,
            product_name: None,
            reason: Some(reason.to_string()),
            new_quantity: material.quantity,
            new_average_cost: material.average_cost,
        }
    }
}

impl TenantScoped for MaterialLog {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}
