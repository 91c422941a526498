//! Catalog browsing commands.

use std::io::Write;

use boutique_core::{FilterOptions, Price, Product, ProductFlag, SortBy};
use clap::Args;

use super::{CliError, Session};

/// Filters for `products list`.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Category slug or name (repeatable)
    #[arg(long)]
    pub category: Vec<String>,
    /// Subcategory slug or name (repeatable)
    #[arg(long)]
    pub subcategory: Vec<String>,
    #[arg(long)]
    pub brand: Vec<String>,
    #[arg(long)]
    pub size: Vec<String>,
    #[arg(long)]
    pub color: Vec<String>,
    #[arg(long)]
    pub min_price: Option<u64>,
    #[arg(long)]
    pub max_price: Option<u64>,
    #[arg(long, default_value_t = 0.0)]
    pub min_rating: f32,
    /// Case-insensitive name search
    #[arg(long)]
    pub search: Option<String>,
    /// featured, price-low, price-high, newest, or rating
    #[arg(long, default_value = "featured")]
    pub sort: SortBy,
    /// new, sale, or featured
    #[arg(long)]
    pub flag: Option<ProductFlag>,
    /// Hide out-of-stock products
    #[arg(long)]
    pub in_stock: bool,
}

impl ListArgs {
    fn options(&self) -> FilterOptions {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some((
                Price::new(min.unwrap_or(0)),
                Price::new(max.unwrap_or(u64::MAX)),
            )),
        };
        FilterOptions {
            categories: self.category.clone(),
            subcategories: self.subcategory.clone(),
            price_range,
            sizes: self.size.clone(),
            colors: self.color.clone(),
            brands: self.brand.clone(),
            min_rating: self.min_rating,
            search: self.search.clone(),
            flag: self.flag,
            in_stock_only: self.in_stock,
            sort_by: self.sort,
        }
    }
}

fn badges(product: &Product) -> String {
    let mut badges = Vec::new();
    if product.is_new() {
        badges.push("new".to_string());
    }
    if product.is_sale() {
        badges.push(product.discount_percentage().map_or_else(
            || "sale".to_string(),
            |pct| format!("-{pct}%"),
        ));
    }
    if !product.in_stock {
        badges.push("sold out".to_string());
    }
    if badges.is_empty() {
        String::new()
    } else {
        format!(" [{}]", badges.join(", "))
    }
}

/// `products list`
pub fn list(session: &Session, args: &ListArgs, out: &mut impl Write) -> Result<(), CliError> {
    let products = session.catalog().filter(&args.options());
    if products.is_empty() {
        writeln!(out, "No products match.")?;
        return Ok(());
    }
    for product in &products {
        writeln!(
            out,
            "{:>4}  {:<28} {:>14}  {:.1}★{}",
            product.id.as_str(),
            product.name,
            product.price.display(),
            product.rating,
            badges(product)
        )?;
    }
    writeln!(out, "{} product(s)", products.len())?;
    Ok(())
}

/// `products show <id>`
pub fn show(session: &Session, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    let product = session.product(id)?;
    writeln!(out, "{} ({}){}", product.name, product.id, badges(&product))?;
    match product.original_price {
        Some(original) if original > product.price => writeln!(
            out,
            "Price:    {} (was {})",
            product.price.display(),
            original.display()
        )?,
        _ => writeln!(out, "Price:    {}", product.price.display())?,
    }
    writeln!(out, "Category: {} / {}", product.category, product.subcategory)?;
    if let Some(brand) = &product.brand {
        writeln!(out, "Brand:    {brand}")?;
    }
    writeln!(
        out,
        "Rating:   {:.1} ({} reviews)",
        product.rating, product.reviews
    )?;
    if let Some(sizes) = &product.sizes {
        writeln!(out, "Sizes:    {}", sizes.join(", "))?;
    }
    if let Some(colors) = &product.colors {
        writeln!(out, "Colors:   {}", colors.join(", "))?;
    }
    if let Some(material) = &product.material {
        writeln!(out, "Material: {material}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", product.description)?;
    Ok(())
}

/// `categories`
pub fn categories(session: &Session, out: &mut impl Write) -> Result<(), CliError> {
    let catalog = session.catalog();
    for category in catalog.categories() {
        writeln!(
            out,
            "{} ({}) - {} product(s)",
            category.name,
            category.slug,
            catalog.by_category(&category.slug).len()
        )?;
        for sub in &category.subcategories {
            writeln!(out, "  {} ({})", sub.name, sub.slug)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(dir.path(), None).unwrap();
        (dir, session)
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let (_dir, session) = session();
        let args = ListArgs {
            category: vec!["sepatu".to_string()],
            sort: SortBy::PriceHigh,
            ..ListArgs::default()
        };
        let mut out = Vec::new();
        list(&session, &args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let heels = text.find("Classic High Heels").unwrap();
        let flats = text.find("Comfortable Flats").unwrap();
        assert!(heels < flats);
        assert!(text.contains("3 product(s)"));
    }

    #[test]
    fn test_show_includes_variants() {
        let (_dir, session) = session();
        let mut out = Vec::new();
        show(&session, "7", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rp 679.000"));
        assert!(text.contains("36, 37, 38, 39, 40"));
        assert!(text.contains("Black, Nude, Red"));
    }

    #[test]
    fn test_categories_lists_subcategories() {
        let (_dir, session) = session();
        let mut out = Vec::new();
        categories(&session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Sepatu (sepatu) - 3 product(s)"));
        assert!(text.contains("  High Heels (high-heels)"));
    }
}
