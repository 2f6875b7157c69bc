//! Kitchen ticket renderer
//!
//! Renders one station's share of an order into ESC/POS commands on a
//! pooled builder. Layout:
//!
//! ```text
//! ================================================
//!                   GRILL
//!                  #12  DINE IN
//!                  Table 5
//! 2024-03-01 19:42
//! ================================================
//! 2 x Paneer Tikka
//!     * extra spicy
//! ------------------------------------------------
//! ```

use chrono_tz::Tz;
use crab_printer::EscPosBuilder;
use shared::models::{Order, OrderItem, OrderType};

use super::types::{DispatchOptions, TicketKind};
use crate::utils::time::format_ticket_time;

/// Data going into one ticket
pub struct Ticket<'a> {
    pub order: &'a Order,
    pub station_name: &'a str,
    /// Items printed on this station's ticket
    pub items: &'a [OrderItem],
    /// Whole order, used for the condensed bill
    pub bill_items: &'a [OrderItem],
    pub kind: &'a TicketKind,
    pub options: DispatchOptions,
}

/// Kitchen ticket renderer
#[derive(Debug, Clone, Copy)]
pub struct KitchenTicketRenderer {
    timezone: Tz,
}

impl KitchenTicketRenderer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Render a ticket into `b`, which must be freshly cleared
    pub fn render(&self, b: &mut EscPosBuilder, ticket: &Ticket<'_>) {
        self.render_header(b, ticket);
        self.render_markers(b, ticket);

        match ticket.kind {
            TicketKind::Kitchen => self.render_items(b, ticket.items),
            TicketKind::Void { reason } => self.render_void(b, ticket.items, reason),
        }

        if ticket.options.attach_bill {
            self.render_bill(b, ticket.order, ticket.bill_items);
        }

        b.feed(3);
        b.cut();
    }

    fn render_header(&self, b: &mut EscPosBuilder, ticket: &Ticket<'_>) {
        let order = ticket.order;

        b.sep_double();
        b.center();
        b.double_size();
        b.bold();
        b.line(&ticket.station_name.to_uppercase());
        b.reset_size();

        b.double_height();
        b.line(&format!("#{}  {}", order.order_number, order_type_label(order.order_type)));
        b.reset_size();
        b.bold_off();

        if let Some(table) = order.table_number.as_deref().filter(|t| !t.is_empty()) {
            b.line(&format!("Table {}", table));
        }
        if let Some(name) = order.customer_name.as_deref().filter(|n| !n.is_empty()) {
            b.line(name);
        }

        b.left();
        b.line(&format_ticket_time(order.created_at, self.timezone));
        b.sep_double();
    }

    fn render_markers(&self, b: &mut EscPosBuilder, ticket: &Ticket<'_>) {
        let mut markers = Vec::new();
        if matches!(ticket.kind, TicketKind::Void { .. }) {
            markers.push("VOID");
        }
        if ticket.options.reprint {
            markers.push("REPRINT");
        }
        if ticket.options.urgent {
            markers.push("URGENT");
        }
        if markers.is_empty() {
            return;
        }

        b.center();
        b.reverse();
        b.double_size();
        b.line(&format!(" {} ", markers.join(" / ")));
        b.reset_size();
        b.reverse_off();
        b.left();
        b.sep_single();
    }

    fn render_items(&self, b: &mut EscPosBuilder, items: &[OrderItem]) {
        for item in items {
            b.double_height();
            b.bold();
            b.line(&format!("{} x {}", item.quantity, item.item_name));
            b.bold_off();
            b.reset_size();

            if let Some(note) = item.special_instructions.as_deref().filter(|n| !n.is_empty()) {
                b.line_wrapped(&format!("* {}", note), 4);
            }
        }
        b.sep_single();
    }

    fn render_void(&self, b: &mut EscPosBuilder, items: &[OrderItem], reason: &str) {
        for item in items {
            b.double_height();
            b.struck_line(&format!("{} x {}", item.quantity, item.item_name));
            b.reset_size();
        }
        b.sep_single();
        b.bold();
        b.line("Reason:");
        b.bold_off();
        b.line_wrapped(reason, 2);
        b.sep_single();
    }

    /// 简版账单
    fn render_bill(&self, b: &mut EscPosBuilder, order: &Order, items: &[OrderItem]) {
        b.center();
        b.bold();
        b.line("BILL");
        b.bold_off();
        b.left();

        for item in items {
            b.line_lr(
                &format!("{} x {}", item.quantity, item.item_name),
                &money(item.line_total),
            );
        }
        b.sep_single();
        b.line_lr("Subtotal", &money(order.subtotal));
        if order.discount_amount > 0.0 {
            b.line_lr("Discount", &format!("-{}", money(order.discount_amount)));
        }
        if order.tax_amount > 0.0 {
            b.line_lr(&format!("Tax ({}%)", order.tax_rate), &money(order.tax_amount));
        }
        b.bold();
        b.double_height();
        b.line_lr("TOTAL", &money(order.total_amount));
        b.reset_size();
        b.bold_off();
        b.sep_double();
    }
}

fn order_type_label(t: OrderType) -> &'static str {
    match t {
        OrderType::DineIn => "DINE IN",
        OrderType::Takeaway => "TAKEAWAY",
        OrderType::Delivery => "DELIVERY",
    }
}

fn money(v: f64) -> String {
    format!("Rs.{:.2}", v)
}
