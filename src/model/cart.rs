use chrono::{DateTime, FixedOffset, Local};
use rust_decimal::Decimal;

use crate::api::web::dto::{CartDto, CartLineDto};

#[derive(Debug, Clone, PartialEq)]
pub struct CartLineModel {
    pub box_id: String,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub added_at: DateTime<FixedOffset>,
}

impl From<CartLineModel> for CartLineDto {
    fn from(value: CartLineModel) -> Self {
        Self {
            box_id: value.box_id,
            title: value.title,
            unit_price: value.unit_price,
            quantity: value.quantity,
            added_at: Some(value.added_at),
        }
    }
}

// staging area before checkout, no durability guarantee, the wishlist
// is the same structure kept at a reserved sequence number
#[derive(Debug, Clone)]
pub struct CartModel {
    pub owner: u32,
    pub seq_num: u8,
    pub title: String,
    pub saved_lines: Vec<CartLineModel>,
}

impl CartModel {
    pub fn new(owner: u32, seq_num: u8) -> Self {
        Self {
            owner,
            seq_num,
            title: "untitled".to_string(),
            saved_lines: Vec::new(),
        }
    }

    pub fn update(&mut self, data: CartDto) {
        if !data.title.is_empty() {
            self.title = data.title;
        }
        data.lines.into_iter().for_each(|d| self.upsert_line(d));
    }

    // quantity zero removes the line, unknown box id with positive
    // quantity inserts a new line
    fn upsert_line(&mut self, data: CartLineDto) {
        let pos = self.saved_lines.iter().position(|l| l.box_id == data.box_id);
        match pos {
            Some(idx) => {
                if data.quantity == 0 {
                    let _removed = self.saved_lines.remove(idx);
                } else {
                    let saved = &mut self.saved_lines[idx];
                    saved.quantity = data.quantity;
                    saved.title = data.title;
                    saved.unit_price = data.unit_price;
                }
            }
            None => {
                if data.quantity > 0 {
                    self.saved_lines.push(CartLineModel {
                        box_id: data.box_id,
                        title: data.title,
                        unit_price: data.unit_price,
                        quantity: data.quantity,
                        added_at: data
                            .added_at
                            .unwrap_or_else(|| Local::now().fixed_offset()),
                    });
                }
            }
        }
    } // end of fn upsert_line

    pub fn num_lines(&self) -> usize {
        self.saved_lines.len()
    }
} // end of impl CartModel

impl From<CartModel> for CartDto {
    fn from(value: CartModel) -> Self {
        Self {
            title: value.title,
            lines: value
                .saved_lines
                .into_iter()
                .map(CartLineDto::from)
                .collect(),
        }
    }
}
