//! Lottery-style ticket generation: unique random numbers from a bounded range.

use crate::domain::model::TicketRequest;
use crate::utils::error::{Result, ToolkitError};
use crate::utils::validation::{expect_integer, validate_at_least, validate_at_most};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_FLOOR: i64 = 1;
pub const MAX_CEILING: i64 = 1000;

/// 號碼範圍的上下限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketPolicy {
    pub min_floor: i64,
    pub max_ceiling: i64,
}

impl Default for TicketPolicy {
    fn default() -> Self {
        Self {
            min_floor: MIN_FLOOR,
            max_ceiling: MAX_CEILING,
        }
    }
}

impl TicketPolicy {
    /// 驗證請求，回傳可選號碼的數量
    pub fn check(&self, min: i64, max: i64, quantity: i64) -> Result<usize> {
        validate_at_least("min", min, self.min_floor)?;
        validate_at_most("max", max, self.max_ceiling)?;
        if max <= min {
            return Err(ToolkitError::out_of_range(
                "max",
                max,
                format!("Value must be greater than min ({})", min),
            ));
        }
        validate_at_least("quantity", quantity, 1)?;

        let available = max
            .checked_sub(min)
            .and_then(|span| span.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ToolkitError::out_of_range("max", max, "range is too large"))?;

        if quantity as u64 > available as u64 {
            return Err(ToolkitError::out_of_range(
                "quantity",
                quantity,
                format!(
                    "must be <= available range ({} numbers from {} to {})",
                    available, min, max
                ),
            ));
        }

        Ok(available)
    }

    pub fn try_pick_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min: i64,
        max: i64,
        quantity: i64,
    ) -> Result<Vec<i64>> {
        let available = self.check(min, max, quantity)?;

        // index::sample 對每個組合的機率相同，且不重複抽取
        let mut picked: Vec<i64> = rand::seq::index::sample(rng, available, quantity as usize)
            .into_iter()
            .map(|offset| min + offset as i64)
            .collect();
        picked.sort_unstable();

        tracing::debug!("Picked {} numbers from {}..={}", picked.len(), min, max);
        Ok(picked)
    }

    pub fn try_pick(&self, min: i64, max: i64, quantity: i64) -> Result<Vec<i64>> {
        self.try_pick_with_rng(&mut rand::thread_rng(), min, max, quantity)
    }

    pub fn pick_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min: i64,
        max: i64,
        quantity: i64,
    ) -> Vec<i64> {
        match self.try_pick_with_rng(rng, min, max, quantity) {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::warn!("Ticket request rejected: {}", e);
                Vec::new()
            }
        }
    }

    pub fn pick(&self, min: i64, max: i64, quantity: i64) -> Vec<i64> {
        self.pick_with_rng(&mut rand::thread_rng(), min, max, quantity)
    }

    pub fn pick_request(&self, request: &TicketRequest) -> Vec<i64> {
        self.pick(request.min, request.max, request.quantity)
    }

    /// 動態型別輸入：三個參數都必須是 JSON 整數（布林值不算）
    pub fn try_pick_json(&self, min: &Value, max: &Value, quantity: &Value) -> Result<Vec<i64>> {
        let min = expect_integer("min", min)?;
        let max = expect_integer("max", max)?;
        let quantity = expect_integer("quantity", quantity)?;
        self.try_pick(min, max, quantity)
    }

    pub fn pick_json(&self, min: &Value, max: &Value, quantity: &Value) -> Vec<i64> {
        match self.try_pick_json(min, max, quantity) {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::warn!("Ticket request rejected: {}", e);
                Vec::new()
            }
        }
    }
}

/// Sorted unique numbers from `[min, max]`, or an empty `Vec` when the request is invalid.
pub fn pick_ticket(min: i64, max: i64, quantity: i64) -> Vec<i64> {
    TicketPolicy::default().pick(min, max, quantity)
}

pub fn try_pick_ticket(min: i64, max: i64, quantity: i64) -> Result<Vec<i64>> {
    TicketPolicy::default().try_pick(min, max, quantity)
}

pub fn pick_ticket_json(min: &Value, max: &Value, quantity: &Value) -> Vec<i64> {
    TicketPolicy::default().pick_json(min, max, quantity)
}
