//! Shop and inventory: stock counts, discounts and purchases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::components::{Food, Item};
use crate::error::GameError;

/// Stock on hand plus any running discounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub food_inventory: BTreeMap<Food, u32>,
    pub items_inventory: BTreeMap<Item, u32>,
    /// Fractional discount (0..=1) keyed by food or item name
    pub current_discounts: BTreeMap<String, f64>,
}

/// Receipt for a successful purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub name: &'static str,
    pub quantity: u32,
    pub cost: u64,
    pub money_left: u64,
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bought {} x {} for {} coins, {} coins left",
            self.quantity, self.name, self.cost, self.money_left
        )
    }
}

/// One row of the inventory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLine {
    pub name: &'static str,
    pub is_food: bool,
    pub stock: u32,
    /// Unit price after discount
    pub unit_price: u64,
}

fn is_known_good(name: &str) -> bool {
    name.parse::<Food>().is_ok() || name.parse::<Item>().is_ok()
}

impl Shop {
    pub fn new(food: BTreeMap<Food, u32>, items: BTreeMap<Item, u32>) -> Self {
        Self {
            food_inventory: food,
            items_inventory: items,
            current_discounts: BTreeMap::new(),
        }
    }

    pub fn discount(&self, name: &str) -> f64 {
        self.current_discounts.get(name).copied().unwrap_or(0.0)
    }

    pub fn set_discount(&mut self, name: &str, fraction: f64) -> Result<(), GameError> {
        if !is_known_good(name) {
            return Err(GameError::UnknownItem(name.to_string()));
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(GameError::InvalidDiscount {
                name: name.to_string(),
                fraction,
            });
        }
        self.current_discounts.insert(name.to_string(), fraction);
        Ok(())
    }

    pub fn clear_discount(&mut self, name: &str) -> bool {
        self.current_discounts.remove(name).is_some()
    }

    /// Listed price times quantity, less any discount, floored
    pub fn quote(&self, name: &str, list_price: u64, quantity: u32) -> u64 {
        let full = list_price * u64::from(quantity);
        match self.current_discounts.get(name) {
            Some(discount) => (full as f64 * (1.0 - discount)).floor() as u64,
            None => full,
        }
    }

    pub fn food_stock(&self, food: Food) -> u32 {
        self.food_inventory.get(&food).copied().unwrap_or(0)
    }

    pub fn item_stock(&self, item: Item) -> u32 {
        self.items_inventory.get(&item).copied().unwrap_or(0)
    }

    pub fn add_food(&mut self, food: Food, quantity: u32) {
        *self.food_inventory.entry(food).or_insert(0) += quantity;
    }

    pub fn add_item(&mut self, item: Item, quantity: u32) {
        *self.items_inventory.entry(item).or_insert(0) += quantity;
    }

    /// Remove one unit of food from stock
    pub fn take_food(&mut self, food: Food) -> Result<(), GameError> {
        match self.food_inventory.get_mut(&food) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(GameError::OutOfStock(food.to_string())),
        }
    }

    /// Remove one unit of an item from stock
    pub fn take_item(&mut self, item: Item) -> Result<(), GameError> {
        match self.items_inventory.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(GameError::OutOfStock(item.to_string())),
        }
    }

    pub fn buy_food(&mut self, food: Food, quantity: u32, money: &mut u64) -> Result<Purchase, GameError> {
        let cost = self.charge(food.as_str(), food.price(), quantity, money)?;
        self.add_food(food, quantity);
        Ok(Purchase {
            name: food.as_str(),
            quantity,
            cost,
            money_left: *money,
        })
    }

    pub fn buy_item(&mut self, item: Item, quantity: u32, money: &mut u64) -> Result<Purchase, GameError> {
        let cost = self.charge(item.as_str(), item.price(), quantity, money)?;
        self.add_item(item, quantity);
        Ok(Purchase {
            name: item.as_str(),
            quantity,
            cost,
            money_left: *money,
        })
    }

    fn charge(
        &self,
        name: &str,
        list_price: u64,
        quantity: u32,
        money: &mut u64,
    ) -> Result<u64, GameError> {
        if quantity == 0 {
            return Err(GameError::ZeroQuantity);
        }
        let cost = self.quote(name, list_price, quantity);
        if *money < cost {
            return Err(GameError::InsufficientFunds {
                needed: cost,
                available: *money,
            });
        }
        *money -= cost;
        Ok(cost)
    }

    /// Every catalog entry with its stock and effective unit price
    pub fn stock_lines(&self) -> Vec<StockLine> {
        let foods = Food::ALL.iter().map(|&food| StockLine {
            name: food.as_str(),
            is_food: true,
            stock: self.food_stock(food),
            unit_price: self.quote(food.as_str(), food.price(), 1),
        });
        let items = Item::ALL.iter().map(|&item| StockLine {
            name: item.as_str(),
            is_food: false,
            stock: self.item_stock(item),
            unit_price: self.quote(item.as_str(), item.price(), 1),
        });
        foods.chain(items).collect()
    }
}
