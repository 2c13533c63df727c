//! Fixed product catalogue.
//!
//! A small slice of the demo shop's assortment: enough categories and
//! products for browsing, search, sorting and cart arithmetic.

use rust_decimal::Decimal;

/// A product category; sub-categories name their parent.
#[derive(Debug, Clone)]
pub struct Category {
    pub slug: &'static str,
    pub name: &'static str,
    pub parent: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: u32,
    pub slug: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    pub short_description: &'static str,
    pub full_description: &'static str,
    pub tags: &'static [&'static str],
    pub free_shipping: bool,
    pub reviews: u32,
    pub featured: bool,
    pub also_purchased: &'static [&'static str],
    pub related: &'static [&'static str],
}

/// Listing sort orders, keyed by the storefront's `orderby` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Position,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    CreatedOn,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::Position,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
        SortOrder::CreatedOn,
    ];

    pub fn from_code(code: u32) -> Self {
        match code {
            5 => SortOrder::NameAsc,
            6 => SortOrder::NameDesc,
            10 => SortOrder::PriceAsc,
            11 => SortOrder::PriceDesc,
            15 => SortOrder::CreatedOn,
            _ => SortOrder::Position,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            SortOrder::Position => 0,
            SortOrder::NameAsc => 5,
            SortOrder::NameDesc => 6,
            SortOrder::PriceAsc => 10,
            SortOrder::PriceDesc => 11,
            SortOrder::CreatedOn => 15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Position => "Position",
            SortOrder::NameAsc => "Name: A to Z",
            SortOrder::NameDesc => "Name: Z to A",
            SortOrder::PriceAsc => "Price: Low to High",
            SortOrder::PriceDesc => "Price: High to Low",
            SortOrder::CreatedOn => "Created on",
        }
    }
}

/// Page sizes offered by listing pages
pub const PAGE_SIZES: [usize; 3] = [4, 8, 12];
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Shortest search term the storefront accepts
pub const MIN_SEARCH_LENGTH: usize = 3;

pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn category(slug: &'static str, name: &'static str, parent: Option<&'static str>) -> Category {
    Category { slug, name, parent }
}

/// A product with no optional extras; callers fill in the rest.
fn product(
    id: u32,
    slug: &'static str,
    name: &'static str,
    category: &'static str,
    cents: i64,
) -> Product {
    Product {
        id,
        slug,
        name,
        category,
        price: money(cents),
        old_price: None,
        short_description: "",
        full_description: "",
        tags: &[],
        free_shipping: false,
        reviews: 0,
        featured: false,
        also_purchased: &[],
        related: &[],
    }
}

impl Catalog {
    /// The assortment the twin serves.
    pub fn demo() -> Self {
        let categories = vec![
            category("books", "Books", None),
            category("computers", "Computers", None),
            category("desktops", "Desktops", Some("computers")),
            category("notebooks", "Notebooks", Some("computers")),
            category("electronics", "Electronics", None),
            category("camera-photo", "Camera, photo", Some("electronics")),
            category("cell-phones", "Cell phones", Some("electronics")),
            category("apparel-shoes", "Apparel & Shoes", None),
            category("digital-downloads", "Digital downloads", None),
            category("jewelry", "Jewelry", None),
            category("gift-cards", "Gift Cards", None),
        ];

        let products = vec![
            Product {
                old_price: Some(money(3000)),
                short_description: "More than 100 tips about computing and internet.",
                full_description: "A must-have reference for everyone who works with a computer every day.",
                tags: &["awesome", "book", "nice"],
                free_shipping: true,
                reviews: 3,
                also_purchased: &["fiction", "health-book"],
                related: &["fiction", "health-book"],
                ..product(13, "computing-and-internet", "Computing and Internet", "books", 1000)
            },
            Product {
                short_description: "Stories that take you somewhere else.",
                related: &["computing-and-internet"],
                reviews: 1,
                ..product(45, "fiction", "Fiction", "books", 2400)
            },
            Product {
                short_description: "Eat well, sleep well, feel well.",
                ..product(22, "health-book", "Health Book", "books", 1000)
            },
            Product {
                short_description: "Build it your way.",
                full_description: "Choose processor, memory and disk for your new desktop.",
                featured: true,
                reviews: 4,
                ..product(72, "build-your-own-computer", "Build your own computer", "desktops", 120000)
            },
            Product {
                short_description: "Everything you need, nothing you don't.",
                featured: true,
                ..product(75, "simple-computer", "Simple Computer", "desktops", 80000)
            },
            Product {
                short_description: "Desktop PC with a CD writer.",
                ..product(3, "desktop-pc-with-cdrw", "Desktop PC with CDRW", "desktops", 50000)
            },
            Product {
                short_description: "Light enough to take anywhere.",
                featured: true,
                ..product(31, "141-inch-laptop", "14.1-inch Laptop", "notebooks", 159000)
            },
            Product {
                short_description: "Full HD recording in your pocket.",
                ..product(19, "camcorder", "Camcorder", "camera-photo", 34900)
            },
            Product {
                short_description: "A smartphone for everyday use.",
                full_description: "Big screen, long battery life and a decent camera.",
                featured: true,
                reviews: 2,
                ..product(43, "smartphone", "Smartphone", "cell-phones", 10000)
            },
            Product {
                short_description: "Second-hand phone in good condition.",
                full_description: "Fully tested, comes with a charger.",
                tags: &["cool", "nice"],
                reviews: 1,
                also_purchased: &["smartphone", "phone-cover"],
                related: &["smartphone", "phone-cover"],
                ..product(15, "used-phone", "Used phone", "cell-phones", 500)
            },
            Product {
                short_description: "Protect your phone from scratches.",
                ..product(80, "phone-cover", "Phone Cover", "cell-phones", 1000)
            },
            Product {
                short_description: "Classic five-pocket jeans.",
                ..product(36, "blue-jeans", "Blue Jeans", "apparel-shoes", 100)
            },
            Product {
                short_description: "Leather belt for the course and the office.",
                ..product(40, "casual-golf-belt", "Casual Golf Belt", "apparel-shoes", 100)
            },
            Product {
                short_description: "No ironing needed.",
                ..product(
                    41,
                    "mens-wrinkle-free-long-sleeve",
                    "Men's Wrinkle Free Long Sleeve",
                    "apparel-shoes",
                    1100,
                )
            },
            Product {
                short_description: "Album by an artist you have not heard of yet.",
                ..product(53, "3rd-album", "3rd Album", "digital-downloads", 100)
            },
            Product {
                short_description: "Black and white diamonds set in a heart.",
                ..product(14, "black-white-diamond-heart", "Black & White Diamond Heart", "jewelry", 13000)
            },
            Product {
                short_description: "Three stones, one promise.",
                ..product(
                    23,
                    "vintage-style-three-stone-diamond-engagement-ring",
                    "Vintage Style Three Stone Diamond Engagement Ring",
                    "jewelry",
                    210000,
                )
            },
            Product {
                short_description: "Delivered by email.",
                featured: true,
                ..product(2, "25-virtual-gift-card", "$25 Virtual Gift Card", "gift-cards", 2500)
            },
        ];

        Self {
            categories,
            products,
        }
    }

    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Top-level categories in menu order
    pub fn top_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| c.parent.is_none())
    }

    pub fn sub_categories<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Category> {
        self.categories
            .iter()
            .filter(move |c| c.parent == Some(parent))
    }

    pub fn product(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    pub fn product_by_id(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Products filed directly under `category`, in catalogue order.
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Products whose name contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let term = term.trim().to_lowercase();
        if term.chars().count() < MIN_SEARCH_LENGTH {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&term))
            .collect()
    }

    pub fn tagged(&self, tag: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Resolves a list of slugs, skipping unknown ones.
    pub fn resolve<'a>(&'a self, slugs: &[&str]) -> Vec<&'a Product> {
        slugs.iter().filter_map(|slug| self.product(slug)).collect()
    }
}

/// Orders a listing in place.
///
/// Name ordering is case-insensitive. `CreatedOn` puts the newest (highest
/// id) first. Ties keep catalogue order.
pub fn sort_products(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::Position => {}
        SortOrder::NameAsc => products.sort_by_key(|p| p.name.to_lowercase()),
        SortOrder::NameDesc => {
            products.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
        SortOrder::PriceAsc => products.sort_by_key(|p| p.price),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::CreatedOn => products.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}

/// Clamps a requested page size to one the storefront offers.
pub fn page_size(requested: Option<usize>) -> usize {
    requested
        .filter(|size| PAGE_SIZES.contains(size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
