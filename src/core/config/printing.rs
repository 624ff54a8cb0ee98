use crate::core::config::data::Config;
use crate::core::config::settings::Settings;

impl Config {
    pub fn print_all(&self) {
        let settings = Settings::from_config(self);
        println!("Current configuration:");
        match self.use_mock {
            Some(true) => println!("  api-mode: mock"),
            Some(false) => println!("  api-mode: live"),
            None => println!(
                "  api-mode: (unset, defaults to {})",
                settings.default_mode.label()
            ),
        }
        match self.registered_number() {
            Some(number) => println!("  registered-number: {number}"),
            None => println!("  registered-number: (unset)"),
        }
        println!("  chat-base-url: {}", settings.chat_base_url);
        println!("  bookings-base-url: {}", settings.bookings_base_url);
        match settings.api_token {
            Some(_) => println!("  api-token: (set)"),
            None => println!("  api-token: (unset)"),
        }
        println!("  reply-delay-ms: {}", settings.reply_delay.as_millis());
        println!("  mock-delay-ms: {}", settings.mock_delay.as_millis());
        println!("  booking-months-ahead: {}", settings.booking_months_ahead);
    }
}
