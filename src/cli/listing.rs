use crate::core::booking::Booking;
use crate::core::calendar::{MonthGrid, WEEKDAY_HEADERS};
use crate::core::transport::BookingQuery;
use crate::ui::layout::{center, pad};

const COLUMNS: [(&str, usize); 7] = [
    ("ID", 8),
    ("Guest", 20),
    ("Contact", 16),
    ("Check-in", 12),
    ("Check-out", 12),
    ("Guests", 6),
    ("Status", 10),
];

pub fn print_bookings(query: &BookingQuery, bookings: &[Booking]) {
    let owner = query.phone.as_deref().unwrap_or("all numbers");
    println!(
        "Bookings from {} to {} ({owner}):",
        query.start_date.format("%Y-%m-%d"),
        query.end_date.format("%Y-%m-%d"),
    );
    println!();

    if bookings.is_empty() {
        println!("No bookings found.");
        return;
    }
    print_booking_lines(bookings);
}

pub fn print_booking_lines(bookings: &[Booking]) {
    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(title, width)| pad(title, *width))
        .collect();
    println!("{}", header.join(" ").trim_end());

    for booking in bookings {
        let guests = booking.guest_count.to_string();
        let cells = [
            booking.id.as_str(),
            booking.guest_name.as_str(),
            booking.contact_display(),
            booking.check_in.raw(),
            booking.check_out.raw(),
            guests.as_str(),
            booking.status.label(),
        ];
        let row: Vec<String> = cells
            .iter()
            .zip(COLUMNS)
            .map(|(cell, (_, width))| pad(cell, width))
            .collect();
        println!("{}", row.join(" ").trim_end());
    }
}

/// Month grid with `*` on booked days and `+` on highlighted ones.
pub fn print_calendar(grid: &MonthGrid<'_>) {
    const CELL: usize = 5;

    println!("{}", center(&grid.title(), CELL * 7));
    let header: String = WEEKDAY_HEADERS.iter().map(|day| center(day, CELL)).collect();
    println!("{}", header.trim_end());

    for week in &grid.weeks {
        let row: String = week
            .iter()
            .map(|day| {
                if !day.in_month {
                    return " ".repeat(CELL);
                }
                let mut label = day.date.format("%-d").to_string();
                if day.is_booked() {
                    label.push('*');
                }
                if day.marked {
                    label.push('+');
                }
                center(&label, CELL)
            })
            .collect();
        println!("{}", row.trim_end());
    }

    println!();
    println!("* booked   + highlighted");
}
