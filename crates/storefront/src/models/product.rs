//! Showcase catalog.
//!
//! The home page lists a fixed set of products; there is no inventory,
//! cart or checkout behind them.

use mauro_core::{CurrencyCode, Price};

/// A product shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: &'static str,
    pub price: Price,
    pub summary: &'static str,
}

/// Products in display order.
#[must_use]
pub fn showcase() -> Vec<Product> {
    vec![
        Product {
            name: "iPhone 15 Pro",
            price: Price::whole(7_500, CurrencyCode::BRL),
            summary: "Titânio, chip A17 Pro e câmera de 48 MP.",
        },
        Product {
            name: "Samsung Galaxy S24",
            price: Price::whole(5_200, CurrencyCode::BRL),
            summary: "Tela Dynamic AMOLED 2X de 6,2 polegadas.",
        },
        Product {
            name: "Carregador Turbo 25W",
            price: Price::whole(149, CurrencyCode::BRL),
            summary: "USB-C com carregamento rápido e cabo incluso.",
        },
    ]
}
