mod create_reminder;
mod delete_reminder;
pub mod dispatch_due_reminders;
mod get_call_logs;
mod get_reminder;
mod get_reminders;
pub mod requeue_stuck_dispatches;
mod snooze_reminder;
mod update_reminder;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_call_logs::get_call_logs_controller;
use get_reminder::get_reminder_controller;
use get_reminders::get_reminders_controller;
use snooze_reminder::snooze_reminder_controller;
use update_reminder::update_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route("/reminders", web::post().to(create_reminder_controller));

    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );

    cfg.route(
        "/reminders/{reminder_id}/call-logs",
        web::get().to(get_call_logs_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/snooze",
        web::post().to(snooze_reminder_controller),
    );
}
