use serde::Serialize;

/// Per-row reconciliation outcome, minor units. At most one field is
/// nonzero and all are >= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Billed minus received, when partially received.
    pub discount: i64,
    /// Received minus billed, when over-received.
    pub excess: i64,
    /// Full billed amount, when nothing was received.
    pub due: i64,
}

/// Derive discount / excess / due from billed vs. received amounts.
///
/// Pure and order-independent across rows. Negative inputs are clamped to
/// 0 first. `sales == received` (including both zero) is fully reconciled;
/// a zero-billed row is never a due.
pub fn reconcile(sales_amount: i64, manual_figures: i64) -> Reconciliation {
    let sales = sales_amount.max(0);
    let received = manual_figures.max(0);

    if received == 0 {
        return Reconciliation {
            due: sales, // 0 when nothing was billed
            ..Default::default()
        };
    }
    if received < sales {
        return Reconciliation {
            discount: sales - received,
            ..Default::default()
        };
    }
    if received > sales {
        return Reconciliation {
            excess: received - sales,
            ..Default::default()
        };
    }
    Reconciliation::default()
}
