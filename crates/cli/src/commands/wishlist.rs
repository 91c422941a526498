//! Wishlist report.

use std::io::Write;

use boutique_storefront::store::WishlistStore;

use super::CliError;

/// Print wishlist entries, oldest first.
pub fn print(wishlist: &WishlistStore, out: &mut impl Write) -> Result<(), CliError> {
    if wishlist.items().is_empty() {
        writeln!(out, "Wishlist is empty.")?;
        return Ok(());
    }
    for entry in wishlist.items() {
        writeln!(
            out,
            "{:>4}  {:<28} {:>14}  added {}",
            entry.product.id.as_str(),
            entry.product.name,
            entry.product.price.display(),
            entry.added_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    writeln!(out, "{} item(s)", wishlist.items().len())?;
    Ok(())
}

/// Print whether `id` is in the wishlist.
pub fn print_membership(id: &str, present: bool, out: &mut impl Write) -> Result<(), CliError> {
    if present {
        writeln!(out, "Product {id} is in the wishlist.")?;
    } else {
        writeln!(out, "Product {id} is not in the wishlist.")?;
    }
    Ok(())
}
