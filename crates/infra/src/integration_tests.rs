//! Integration tests for the full ledger pipeline.
//!
//! Tests: Operation → Coordinator → LedgerStore → Queries
//!
//! Verifies:
//! - Costs roll correctly from purchase through production to COGS
//! - Failed operations leave no partial state behind
//! - Tenant isolation is preserved
//! - Concurrent writers converge through conflict retry
//! - Audit trails reconcile against current quantities

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;

    use millbook_core::{DomainError, TenantId};
    use millbook_finance::{CashflowCategory, CashflowKind};
    use millbook_inventory::InventoryLogKind;
    use millbook_materials::{MaterialId, MaterialLogKind, Unit};
    use millbook_products::{BomLine, ProductId, ProductionStatus};
    use millbook_receivables::ReceivableStatus;
    use millbook_sales::{OrderId, OrderLine, OrderStatus};

    use crate::audit::{reconcile_inventory, reconcile_material};
    use crate::coordinator::{Coordinator, EngineError, RetryPolicy};
    use crate::ledger_store::{InMemoryLedgerStore, LedgerStore};
    use crate::operations::{
        AdjustInventoryStock, AdjustMaterialStock, CancelOrder, CollectPayment, CreateMaterial,
        CreateProduct, CreateSalesOrder, DeliverOrder, ReceivePurchase, RecordExpense,
        RunProduction,
    };
    use crate::queries;

    fn test_tenant_id() -> TenantId {
        TenantId::new()
    }

    fn engine() -> Coordinator<InMemoryLedgerStore> {
        Coordinator::new(InMemoryLedgerStore::new())
    }

    fn catalog_steel<S: LedgerStore>(engine: &Coordinator<S>, tenant_id: TenantId) -> MaterialId {
        engine
            .execute(
                tenant_id,
                &CreateMaterial {
                    name: "Steel".to_string(),
                    unit: Unit::Kg,
                    min_stock: 20.0,
                },
            )
            .unwrap()
            .receipt
    }

    /// A widget consumes 2 kg of steel per unit and sells for 100.00.
    fn catalog_widget<S: LedgerStore>(
        engine: &Coordinator<S>,
        tenant_id: TenantId,
        steel: MaterialId,
    ) -> ProductId {
        engine
            .execute(
                tenant_id,
                &CreateProduct {
                    name: "Widget".to_string(),
                    unit_price: 100.0,
                    bom: vec![BomLine {
                        material_id: steel,
                        material_name: "Steel".to_string(),
                        quantity_per_unit: 2.0,
                    }],
                },
            )
            .unwrap()
            .receipt
    }

    fn order_widgets<S: LedgerStore>(
        engine: &Coordinator<S>,
        tenant_id: TenantId,
        product_id: ProductId,
        quantity: f64,
    ) -> OrderId {
        engine
            .execute(
                tenant_id,
                &CreateSalesOrder {
                    customer_name: "Acme Traders".to_string(),
                    lines: vec![OrderLine {
                        product_id,
                        product_name: "Widget".to_string(),
                        quantity,
                        unit_price: 100.0,
                    }],
                },
            )
            .unwrap()
            .receipt
            .order_id
    }

    #[test]
    fn full_cycle_from_purchase_to_settled_receivable() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);

        // Two purchases blend the running average: 5000/100, then 8000/150.
        let first = engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 100.0,
                    total_cost: 5000.0,
                },
            )
            .unwrap();
        assert_eq!(first.attempts, 1);
        assert_eq!(first.receipt.unit_cost, 50.0);
        assert_eq!(first.receipt.new_average_cost, 50.0);

        let second = engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 50.0,
                    total_cost: 3000.0,
                },
            )
            .unwrap()
            .receipt;
        let blended = 8000.0 / 150.0;
        assert_eq!(second.new_quantity, 150.0);
        assert!((second.new_average_cost - blended).abs() < 1e-9);

        // Producing 10 widgets draws 20 kg at the blended average.
        let production = engine
            .execute(
                tenant_id,
                &RunProduction {
                    product_id: widget,
                    quantity: 10.0,
                },
            )
            .unwrap()
            .receipt;
        assert_eq!(production.consumed.len(), 1);
        assert_eq!(production.consumed[0].consumed, 20.0);
        assert!((production.total_cost - 20.0 * blended).abs() < 1e-9);
        assert!((production.unit_cost - 2.0 * blended).abs() < 1e-9);
        assert_eq!(production.new_stock, 10.0);

        // Delivering 5 widgets captures COGS at the finished-goods average.
        let order_id = order_widgets(&engine, tenant_id, widget, 5.0);
        let delivery = engine
            .execute(tenant_id, &DeliverOrder { order_id })
            .unwrap()
            .receipt;
        assert!((delivery.total_cogs - 10.0 * blended).abs() < 1e-9);
        assert_eq!(delivery.lines.len(), 1);

        // Two collections settle the 500.00 receivable.
        let partial = engine
            .execute(
                tenant_id,
                &CollectPayment {
                    receivable_id: delivery.receivable_id,
                    amount: 200.0,
                },
            )
            .unwrap()
            .receipt;
        assert_eq!(partial.status, ReceivableStatus::Partial);
        assert_eq!(partial.due_amount, 300.0);
        assert!(!partial.settled);

        let settled = engine
            .execute(
                tenant_id,
                &CollectPayment {
                    receivable_id: delivery.receivable_id,
                    amount: 300.0,
                },
            )
            .unwrap()
            .receipt;
        assert_eq!(settled.status, ReceivableStatus::Paid);
        assert!(settled.settled);

        engine
            .execute(
                tenant_id,
                &RecordExpense {
                    category: "Utilities".to_string(),
                    description: "Diesel for generator".to_string(),
                    amount: 50.0,
                    spent_on: Utc::now(),
                },
            )
            .unwrap();

        // The stored ledger agrees with every receipt.
        let store = engine.store();
        let materials = queries::list_materials(store, tenant_id).unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].doc.quantity, 130.0);

        let inventory = queries::list_inventory(store, tenant_id).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].doc.quantity, 5.0);

        let orders = queries::list_orders(store, tenant_id).unwrap();
        assert_eq!(orders[0].doc.status, OrderStatus::Delivered);
        assert!((orders[0].doc.total_cost.unwrap() - 10.0 * blended).abs() < 1e-9);

        let runs = queries::list_production_orders(store, tenant_id).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].doc.status, ProductionStatus::Completed);

        let receivables = queries::list_receivables(store, tenant_id).unwrap();
        assert_eq!(receivables[0].doc.status, ReceivableStatus::Paid);
        assert_eq!(receivables[0].doc.paid_amount, 500.0);

        let collections = queries::list_collections(store, tenant_id).unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].doc.amount, 200.0);
        assert_eq!(collections[1].doc.amount, 300.0);

        // Cash moved five times: two purchases out, two collections in, one
        // expense out.
        let cashflow = queries::list_cashflow(store, tenant_id).unwrap();
        assert_eq!(cashflow.len(), 5);
        assert_eq!(cashflow[0].doc.kind, CashflowKind::Outflow);
        assert_eq!(cashflow[0].doc.description, "Purchase: Steel (100 kg)");
        let inflows = cashflow
            .iter()
            .filter(|entry| entry.doc.kind == CashflowKind::Inflow)
            .count();
        assert_eq!(inflows, 2);

        // Every audit trail still explains its current quantity.
        assert!(reconcile_material(store, tenant_id, steel)
            .unwrap()
            .is_balanced());
        assert!(reconcile_inventory(store, tenant_id, widget)
            .unwrap()
            .is_balanced());

        let summary = queries::finance_summary(store, tenant_id).unwrap();
        assert_eq!(summary.revenue, 500.0);
        assert!((summary.cogs - 10.0 * blended).abs() < 1e-9);
        assert_eq!(summary.total_expenses, 50.0);
        assert!((summary.material_value - 130.0 * blended).abs() < 1e-9);
        assert!((summary.finished_goods_value - 10.0 * blended).abs() < 1e-9);
        assert_eq!(summary.outstanding_receivables, 0.0);
        assert!(
            (summary.working_capital
                - (summary.material_value + summary.finished_goods_value))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn delivery_shortage_fails_atomically() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);

        engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 10.0,
                    total_cost: 500.0,
                },
            )
            .unwrap();
        engine
            .execute(
                tenant_id,
                &RunProduction {
                    product_id: widget,
                    quantity: 2.0,
                },
            )
            .unwrap();

        let order_id = order_widgets(&engine, tenant_id, widget, 5.0);
        match engine.execute(tenant_id, &DeliverOrder { order_id }) {
            Err(EngineError::Domain(DomainError::InsufficientStock {
                name,
                required,
                available,
            })) => {
                assert_eq!(name, "Widget");
                assert_eq!(required, 5.0);
                assert_eq!(available, 2.0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Nothing moved: the order is still pending, stock is untouched, no
        // receivable was raised.
        let store = engine.store();
        let orders = queries::list_orders(store, tenant_id).unwrap();
        assert_eq!(orders[0].doc.status, OrderStatus::Pending);
        assert!(orders[0].doc.total_cost.is_none());

        let inventory = queries::list_inventory(store, tenant_id).unwrap();
        assert_eq!(inventory[0].doc.quantity, 2.0);

        assert!(queries::list_receivables(store, tenant_id)
            .unwrap()
            .is_empty());
        assert_eq!(
            queries::inventory_history(store, tenant_id, widget)
                .unwrap()
                .len(),
            1
        );
        assert!(reconcile_inventory(store, tenant_id, widget)
            .unwrap()
            .is_balanced());
    }

    #[test]
    fn production_shortage_leaves_materials_untouched() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);

        engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 10.0,
                    total_cost: 500.0,
                },
            )
            .unwrap();

        // Ten widgets need 20 kg; only 10 kg is on hand.
        match engine.execute(
            tenant_id,
            &RunProduction {
                product_id: widget,
                quantity: 10.0,
            },
        ) {
            Err(EngineError::Domain(DomainError::InsufficientStock {
                name,
                required,
                available,
            })) => {
                assert_eq!(name, "Steel");
                assert_eq!(required, 20.0);
                assert_eq!(available, 10.0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // The material kept its stock and cost, no finished goods appeared,
        // and no run was recorded.
        let store = engine.store();
        let materials = queries::list_materials(store, tenant_id).unwrap();
        assert_eq!(materials[0].doc.quantity, 10.0);
        assert_eq!(materials[0].doc.average_cost, 50.0);

        assert!(queries::list_inventory(store, tenant_id).unwrap().is_empty());
        assert!(queries::list_production_orders(store, tenant_id)
            .unwrap()
            .is_empty());
        assert_eq!(
            queries::material_history(store, tenant_id, steel)
                .unwrap()
                .len(),
            1
        );
        assert!(reconcile_material(store, tenant_id, steel)
            .unwrap()
            .is_balanced());
    }

    #[test]
    fn concurrent_purchases_converge_through_retry() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let tenant_id = test_tenant_id();
        let policy = RetryPolicy {
            max_attempts: 50,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(8),
        };

        let material_id = catalog_steel(&Coordinator::new(Arc::clone(&store)), tenant_id);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = Coordinator::with_policy(Arc::clone(&store), policy.clone());
            handles.push(std::thread::spawn(move || {
                for _ in 0..5 {
                    engine
                        .execute(
                            tenant_id,
                            &ReceivePurchase {
                                material_id,
                                quantity: 10.0,
                                total_cost: 500.0,
                            },
                        )
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Twenty purchases of 10 kg at 50.00 each, no update lost.
        let materials = queries::list_materials(store.as_ref(), tenant_id).unwrap();
        assert_eq!(materials[0].doc.quantity, 200.0);
        assert_eq!(materials[0].doc.average_cost, 50.0);
        assert_eq!(
            queries::material_history(store.as_ref(), tenant_id, material_id)
                .unwrap()
                .len(),
            20
        );
        assert!(reconcile_material(store.as_ref(), tenant_id, material_id)
            .unwrap()
            .is_balanced());
    }

    #[test]
    fn tenant_isolation_preserved() {
        let engine = engine();
        let tenant1 = test_tenant_id();
        let tenant2 = test_tenant_id();

        let steel = catalog_steel(&engine, tenant1);
        engine
            .execute(
                tenant1,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 100.0,
                    total_cost: 5000.0,
                },
            )
            .unwrap();
        engine
            .execute(
                tenant2,
                &CreateMaterial {
                    name: "Copper".to_string(),
                    unit: Unit::Kg,
                    min_stock: 5.0,
                },
            )
            .unwrap();

        let store = engine.store();
        let first = queries::list_materials(store, tenant1).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].doc.name, "Steel");

        let second = queries::list_materials(store, tenant2).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].doc.name, "Copper");

        // Another tenant's ids resolve to nothing.
        match engine.execute(
            tenant2,
            &ReceivePurchase {
                material_id: steel,
                quantity: 1.0,
                total_cost: 50.0,
            },
        ) {
            Err(EngineError::Domain(DomainError::NotFound { entity, .. })) => {
                assert_eq!(entity, "raw material");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(queries::list_cashflow(store, tenant2).unwrap().is_empty());
    }

    #[test]
    fn cancelled_order_cannot_be_delivered() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);

        let order_id = order_widgets(&engine, tenant_id, widget, 2.0);
        engine
            .execute(tenant_id, &CancelOrder { order_id })
            .unwrap();

        match engine.execute(tenant_id, &DeliverOrder { order_id }) {
            Err(EngineError::Domain(DomainError::Validation(msg))) => {
                assert!(msg.contains("not pending"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        let orders = queries::list_orders(engine.store(), tenant_id).unwrap();
        assert_eq!(orders[0].doc.status, OrderStatus::Cancelled);
    }

    #[test]
    fn overpayment_is_rejected_without_side_effects() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);
        engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 100.0,
                    total_cost: 5000.0,
                },
            )
            .unwrap();
        engine
            .execute(
                tenant_id,
                &RunProduction {
                    product_id: widget,
                    quantity: 10.0,
                },
            )
            .unwrap();
        let order_id = order_widgets(&engine, tenant_id, widget, 5.0);
        let receivable_id = engine
            .execute(tenant_id, &DeliverOrder { order_id })
            .unwrap()
            .receipt
            .receivable_id;

        match engine.execute(
            tenant_id,
            &CollectPayment {
                receivable_id,
                amount: 600.0,
            },
        ) {
            Err(EngineError::Domain(DomainError::PaymentExceedsDue { amount, due })) => {
                assert_eq!(amount, 600.0);
                assert_eq!(due, 500.0);
            }
            other => panic!("expected PaymentExceedsDue, got {other:?}"),
        }

        let store = engine.store();
        assert!(queries::list_collections(store, tenant_id)
            .unwrap()
            .is_empty());
        let inflows = queries::list_cashflow(store, tenant_id)
            .unwrap()
            .into_iter()
            .filter(|entry| entry.doc.kind == CashflowKind::Inflow)
            .count();
        assert_eq!(inflows, 0);

        // The exact balance still settles in one payment.
        let settled = engine
            .execute(
                tenant_id,
                &CollectPayment {
                    receivable_id,
                    amount: 500.0,
                },
            )
            .unwrap()
            .receipt;
        assert_eq!(settled.status, ReceivableStatus::Paid);
        assert!(settled.settled);
    }

    #[test]
    fn expenses_keep_their_spend_date_and_pair_with_outflows() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let spent_on = Utc::now() - chrono::Duration::days(90);

        engine
            .execute(
                tenant_id,
                &RecordExpense {
                    category: "Utilities".to_string(),
                    description: "Diesel for generator".to_string(),
                    amount: 75.5,
                    spent_on,
                },
            )
            .unwrap();

        let store = engine.store();
        let expenses = queries::list_expenses(store, tenant_id).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].doc.spent_on, spent_on);
        assert!(expenses[0].recorded_at > spent_on);

        let cashflow = queries::list_cashflow(store, tenant_id).unwrap();
        assert_eq!(cashflow.len(), 1);
        assert_eq!(cashflow[0].doc.kind, CashflowKind::Outflow);
        assert_eq!(cashflow[0].doc.category, CashflowCategory::Expense);
        assert_eq!(
            cashflow[0].doc.description,
            "Expense: Diesel for generator (Utilities)"
        );
        assert_eq!(cashflow[0].doc.amount, 75.5);
    }

    #[test]
    fn manual_adjustments_stay_reconcilable() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 30.0,
                    total_cost: 1500.0,
                },
            )
            .unwrap();

        let shrink = engine
            .execute(
                tenant_id,
                &AdjustMaterialStock {
                    material_id: steel,
                    delta: -15.0,
                    reason: "physical count".to_string(),
                },
            )
            .unwrap()
            .receipt;
        assert_eq!(shrink.new_quantity, 15.0);

        engine
            .execute(
                tenant_id,
                &AdjustMaterialStock {
                    material_id: steel,
                    delta: 3.0,
                    reason: "recount".to_string(),
                },
            )
            .unwrap();

        match engine.execute(
            tenant_id,
            &AdjustMaterialStock {
                material_id: steel,
                delta: -1.0,
                reason: "   ".to_string(),
            },
        ) {
            Err(EngineError::Domain(DomainError::Validation(msg))) => {
                assert!(msg.contains("reason"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }

        // 18 kg on hand against a 20 kg threshold.
        let store = engine.store();
        let low = queries::low_stock_materials(store, tenant_id).unwrap();
        assert_eq!(low.len(), 1);

        let history = queries::material_history(store, tenant_id, steel).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].doc.kind, MaterialLogKind::ManualDeduct);
        assert_eq!(history[1].doc.reason.as_deref(), Some("physical count"));
        assert_eq!(history[2].doc.kind, MaterialLogKind::ManualAdd);

        let check = reconcile_material(store, tenant_id, steel).unwrap();
        assert!(check.is_balanced());
        assert_eq!(check.current_quantity, 18.0);
    }

    #[test]
    fn finished_goods_adjustments_follow_the_same_rules() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);

        // Nothing produced yet, so there is no item to correct.
        match engine.execute(
            tenant_id,
            &AdjustInventoryStock {
                product_id: widget,
                delta: -1.0,
                reason: "damage".to_string(),
            },
        ) {
            Err(EngineError::Domain(DomainError::NotFound { entity, .. })) => {
                assert_eq!(entity, "inventory item");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }

        engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 10.0,
                    total_cost: 500.0,
                },
            )
            .unwrap();
        engine
            .execute(
                tenant_id,
                &RunProduction {
                    product_id: widget,
                    quantity: 5.0,
                },
            )
            .unwrap();

        let shrink = engine
            .execute(
                tenant_id,
                &AdjustInventoryStock {
                    product_id: widget,
                    delta: -2.0,
                    reason: "damaged in storage".to_string(),
                },
            )
            .unwrap()
            .receipt;
        assert_eq!(shrink.new_quantity, 3.0);

        let store = engine.store();
        let items = queries::list_inventory(store, tenant_id).unwrap();
        assert_eq!(items[0].doc.quantity, 3.0);
        assert_eq!(items[0].doc.average_cost, 100.0);

        let history = queries::inventory_history(store, tenant_id, widget).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].doc.kind, InventoryLogKind::ManualDeduct);
        assert_eq!(history[1].doc.reason.as_deref(), Some("damaged in storage"));

        let check = reconcile_inventory(store, tenant_id, widget).unwrap();
        assert!(check.is_balanced());
        assert_eq!(check.current_quantity, 3.0);
    }

    #[test]
    fn outstanding_receivables_age_into_buckets() {
        let engine = engine();
        let tenant_id = test_tenant_id();
        let steel = catalog_steel(&engine, tenant_id);
        let widget = catalog_widget(&engine, tenant_id, steel);
        engine
            .execute(
                tenant_id,
                &ReceivePurchase {
                    material_id: steel,
                    quantity: 100.0,
                    total_cost: 5000.0,
                },
            )
            .unwrap();
        engine
            .execute(
                tenant_id,
                &RunProduction {
                    product_id: widget,
                    quantity: 10.0,
                },
            )
            .unwrap();
        let order_id = order_widgets(&engine, tenant_id, widget, 5.0);
        let delivery = engine
            .execute(tenant_id, &DeliverOrder { order_id })
            .unwrap()
            .receipt;
        engine
            .execute(
                tenant_id,
                &CollectPayment {
                    receivable_id: delivery.receivable_id,
                    amount: 200.0,
                },
            )
            .unwrap();

        let store = engine.store();

        // Inside the payment term everything is current.
        let today = queries::receivable_aging(store, tenant_id, Utc::now()).unwrap();
        assert_eq!(today.current.count, 1);
        assert_eq!(today.current.outstanding, 300.0);
        assert_eq!(today.total_outstanding, 300.0);

        // Fifteen days past due lands in the 1-30 bucket.
        let later = queries::receivable_aging(
            store,
            tenant_id,
            delivery.due_date + chrono::Duration::days(15),
        )
        .unwrap();
        assert_eq!(later.current.count, 0);
        assert_eq!(later.days_1_to_30.count, 1);
        assert_eq!(later.days_1_to_30.outstanding, 300.0);

        // Far past due rolls into the oldest bucket.
        let ancient = queries::receivable_aging(
            store,
            tenant_id,
            delivery.due_date + chrono::Duration::days(120),
        )
        .unwrap();
        assert_eq!(ancient.over_90.count, 1);
        assert_eq!(ancient.total_outstanding, 300.0);
    }
}
