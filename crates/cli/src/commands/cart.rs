//! Cart report.

use std::io::Write;

use boutique_storefront::store::CartStore;

use super::CliError;

fn variant_label(size: Option<&str>, color: Option<&str>) -> String {
    match (size, color) {
        (Some(size), Some(color)) => format!(" (size {size}, {color})"),
        (Some(size), None) => format!(" (size {size})"),
        (None, Some(color)) => format!(" ({color})"),
        (None, None) => String::new(),
    }
}

/// Print the cart lines followed by the order summary.
pub fn print(cart: &CartStore, out: &mut impl Write) -> Result<(), CliError> {
    if cart.items().is_empty() {
        writeln!(out, "Cart is empty.")?;
        return Ok(());
    }

    for line in cart.items() {
        writeln!(
            out,
            "{:>4}  {}{}  x{}  {}",
            line.product.id.as_str(),
            line.product.name,
            variant_label(line.size.as_deref(), line.color.as_deref()),
            line.quantity,
            line.line_total().display()
        )?;
    }

    let summary = cart.summary();
    writeln!(out)?;
    writeln!(out, "Items:    {}", summary.item_count)?;
    writeln!(out, "Subtotal: {}", summary.subtotal.display())?;
    if summary.free_shipping() {
        writeln!(out, "Shipping: free")?;
    } else {
        writeln!(out, "Shipping: {}", summary.shipping.display())?;
    }
    writeln!(out, "Total:    {}", summary.total.display())?;
    Ok(())
}
