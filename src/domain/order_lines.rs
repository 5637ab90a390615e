use std::collections::HashMap;

use uuid::Uuid;

/// A requested quantity of one item inside a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine{
    pub item_id: Uuid,
    pub quantity: i32
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OrderLinesError{
    #[error("order must contain at least one item")]
    Empty,
    #[error("quantity for item {0} must be greater than zero")]
    NonPositiveQuantity(Uuid),
    #[error("quantity for item {0} is too large")]
    QuantityOverflow(Uuid)
}

/// Validates the requested lines and merges repeated items into one line,
/// keeping the order in which items first appear.
pub fn merge_order_lines(lines: Vec<OrderLine>) -> Result<Vec<OrderLine>, OrderLinesError>{
    if lines.is_empty() {
        return Err(OrderLinesError::Empty)
    }

    let mut merged: Vec<OrderLine> = Vec::with_capacity(lines.len());
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for line in lines {
        if line.quantity <= 0 {
            return Err(OrderLinesError::NonPositiveQuantity(line.item_id))
        }

        match positions.get(&line.item_id) {
            Some(&index) => {
                let existing = &mut merged[index];
                existing.quantity = existing.quantity
                    .checked_add(line.quantity)
                    .ok_or(OrderLinesError::QuantityOverflow(line.item_id))?;
            },
            None => {
                positions.insert(line.item_id, merged.len());
                merged.push(line);
            }
        }
    }

    Ok(merged)
}

/// Σ quantity × unit_price, `None` on overflow.
pub fn order_total<I>(priced_lines: I) -> Option<i64>
where
    I: IntoIterator<Item = (i32, i32)>
{
    priced_lines
        .into_iter()
        .try_fold(0_i64, |total, (quantity, unit_price)| {
            i64::from(quantity)
                .checked_mul(i64::from(unit_price))
                .and_then(|line_total| total.checked_add(line_total))
        })
}
