pub mod deduction;
pub mod employee;
pub mod hours_entry;
pub mod payroll_cycle;
pub mod report;
