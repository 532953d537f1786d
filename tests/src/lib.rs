#[cfg(test)]
mod pipeline {
    mod integration;
}
